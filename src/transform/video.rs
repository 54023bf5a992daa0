//! Embedded players and download links derived from the entry URL.

use html_escape::encode_double_quoted_attribute;
use regex::Regex;
use std::sync::LazyLock;

static YOUTUBE_VIDEO_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"youtube\.com/watch\?v=(.*)$").unwrap());

static YOUTUBE_SHORTS_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"youtube\.com/shorts/([a-zA-Z0-9_-]{11})$").unwrap());

static YOUTUBE_ID_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"youtube_id"?\s*[:=]\s*"([a-zA-Z0-9_-]{11})""#).unwrap());

/// Video id from a YouTube watch or shorts URL.
fn youtube_video_id(entry_url: &str) -> Option<&str> {
	YOUTUBE_VIDEO_REGEX
		.captures(entry_url)
		.or_else(|| YOUTUBE_SHORTS_REGEX.captures(entry_url))
		.and_then(|captures| captures.get(1))
		.map(|id| id.as_str())
}

fn video_player(src: &str) -> String {
	format!(
		r#"<iframe width="650" height="350" frameborder="0" src="{}" allowfullscreen></iframe><br>"#,
		encode_double_quoted_attribute(src)
	)
}

/// Prepend a player for the YouTube video the entry links to.
pub fn add_youtube_video(entry_url: &str, content: String, embed_url_template: &str) -> String {
	match youtube_video_id(entry_url) {
		Some(id) => video_player(&format!("{embed_url_template}{id}")) + &content,
		None => content,
	}
}

/// Prepend an Invidious player for the YouTube video the entry links to.
pub fn add_youtube_video_using_invidious_player(
	entry_url: &str,
	content: String,
	invidious_instance: &str,
) -> String {
	match youtube_video_id(entry_url) {
		Some(id) => video_player(&format!("https://{invidious_instance}/embed/{id}")) + &content,
		None => content,
	}
}

/// Prepend one player per `youtube_id` assignment found in the content.
pub fn add_youtube_video_from_id(content: String, embed_url_template: &str) -> String {
	let players: String = YOUTUBE_ID_REGEX
		.captures_iter(&content)
		.filter_map(|captures| captures.get(1))
		.map(|id| video_player(&format!("{embed_url_template}{}", id.as_str())))
		.collect();

	if players.is_empty() {
		content
	} else {
		players + &content
	}
}

/// Prepend a player for an Invidious `/watch?v=` URL, hosted by the same instance.
///
/// Query parameters other than `v` are carried over to the embed URL, sorted
/// by name.
pub fn add_invidious_video(entry_url: &str, content: String) -> String {
	let Ok(url) = url::Url::parse(entry_url) else {
		return content;
	};
	if !matches!(url.scheme(), "http" | "https") || url.path() != "/watch" {
		return content;
	}
	let Some(host) = url.host_str() else {
		return content;
	};

	let mut video_id = None;
	let mut params = Vec::new();
	for (key, value) in url.query_pairs() {
		if key == "v" && video_id.is_none() {
			video_id = Some(value.into_owned());
		} else {
			params.push((key.into_owned(), value.into_owned()));
		}
	}
	let Some(video_id) = video_id.filter(|id| !id.is_empty()) else {
		return content;
	};

	let authority = match url.port() {
		Some(port) => format!("{host}:{port}"),
		None => host.to_string(),
	};
	let mut src = format!("https://{authority}/embed/{video_id}");

	params.sort_by(|(a, _), (b, _)| a.cmp(b));
	if !params.is_empty() {
		let query = url::form_urlencoded::Serializer::new(String::new())
			.extend_pairs(&params)
			.finish();
		src.push('?');
		src.push_str(&query);
	}

	video_player(&src) + &content
}

/// Prepend the Castopod light player for the episode page.
pub fn add_castopod_episode(entry_url: &str, content: String) -> String {
	format!(
		r#"<iframe width="650" frameborder="0" src="{}/embed/light"></iframe><br>{content}"#,
		encode_double_quoted_attribute(entry_url)
	)
}

/// Prepend a download link when the entry itself is a PDF.
pub fn add_pdf_download_link(entry_url: &str, content: String) -> String {
	if !entry_url.ends_with(".pdf") {
		return content;
	}

	format!(
		r#"<a href="{}">PDF</a><br>{content}"#,
		encode_double_quoted_attribute(entry_url)
	)
}
