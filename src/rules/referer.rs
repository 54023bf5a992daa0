/// Hostnames that require a fixed referer, checked first.
const EXACT_HOST_REFERERS: &[(&str, &str)] = &[
	("i.pximg.net", "https://www.pixiv.net"),
	("sp1.piokok.com", "https://sp1.piokok.com"),
	("cdnfile.sspai.com", "https://sspai.com"),
	("f.video.weibocdn.com", "https://weibo.com"),
	("img.hellogithub.com", "https://hellogithub.com"),
];

/// Host suffixes that require a fixed referer, in priority order.
const SUFFIX_HOST_REFERERS: &[(&str, &str)] = &[
	(".sinaimg.cn", "https://weibo.com"),
	(".cdninstagram.com", "https://www.instagram.com"),
];

/// Referer to send when fetching media from `url`, if the host needs one.
pub fn referer_for_url(url: &str) -> Option<&'static str> {
	let parsed = url::Url::parse(url).ok()?;
	let host = parsed.host_str()?;

	EXACT_HOST_REFERERS
		.iter()
		.find(|&&(exact, _)| host == exact)
		.or_else(|| {
			SUFFIX_HOST_REFERERS
				.iter()
				.find(|&&(suffix, _)| host.ends_with(suffix))
		})
		.map(|&(_, referer)| referer)
}
