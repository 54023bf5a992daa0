/// Built-in rules per site, as `(domain fragment, rule text)`.
///
/// Evaluated top to bottom; the first fragment contained in the entry's domain
/// wins. Fragments must not overlap.
pub const PREDEFINED_RULES: &[(&str, &str)] = &[
	("abstrusegoose.com", "add_image_title"),
	("amazingsuperpowers.com", "add_image_title"),
	(
		"blog.cloudflare.com",
		r#"add_image_title,remove("figure.kg-image-card figure.kg-image + img")"#,
	),
	("cowbirdsinlove.com", "add_image_title"),
	("drawingboardcomic.com", "add_image_title"),
	("exocomics.com", "add_image_title"),
	("framatube.org", "nl2br,convert_text_link"),
	("happletea.com", "add_image_title"),
	(
		"ilpost.it",
		r#"remove(".art_tag, #audioPlayerArticle, .author-container, .caption, .ilpostShare, .lastRecents, #mc_embed_signup, .outbrain_inread, p:has(.leggi-anche), .youtube-overlay")"#,
	),
	("imogenquest.net", "add_image_title"),
	("lukesurl.com", "add_image_title"),
	("medium.com", "fix_medium_images"),
	("mercworks.net", "add_image_title"),
	("monkeyuser.com", "add_image_title"),
	("mrlovenstein.com", "add_image_title"),
	("nedroid.com", "add_image_title"),
	(
		"oglaf.com",
		r#"replace("media.oglaf.com/story/tt(.+).gif"|"media.oglaf.com/comic/$1.jpg"),add_image_title"#,
	),
	("optipess.com", "add_image_title"),
	("peebleslab.com", "add_image_title"),
	(
		"quantamagazine.org",
		r#"add_youtube_video_from_id, remove("h6:not(.byline,.post__title__kicker), #comments, .next-post__content, .footer__section, figure .outer--content, script")"#,
	),
	("sentfromthemoon.com", "add_image_title"),
	("thedoghousediaries.com", "add_image_title"),
	(
		"theverge.com",
		r#"add_dynamic_image, remove("div.duet--recirculation--related-list, .hidden")"#,
	),
	("treelobsters.com", "add_image_title"),
	(
		"webtoons.com",
		r#"add_dynamic_image,replace("webtoon"|"swebtoon")"#,
	),
	("www.qwantz.com", "add_image_title,add_mailto_subject"),
	("xkcd.com", "add_image_title"),
	("youtube.com", "add_youtube_video"),
];

/// Host of `url`, with the port when one is given. Empty when `url` is not an
/// absolute URL.
pub fn url_domain(url: &str) -> String {
	match url::Url::parse(url) {
		Ok(parsed) => {
			let host = parsed.host_str().unwrap_or_default();
			match parsed.port() {
				Some(port) => format!("{host}:{port}"),
				None => host.to_string(),
			}
		}
		Err(_) => String::new(),
	}
}

/// Rule text of the first predefined entry matching the URL's domain, or `""`.
pub fn predefined_rules_for(url: &str) -> &'static str {
	let domain = url_domain(url);

	PREDEFINED_RULES
		.iter()
		.find(|(fragment, _)| domain.contains(fragment))
		.map_or("", |&(_, rules)| rules)
}
