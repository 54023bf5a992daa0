//! Image and iframe rewrites: captions, lazy-loaded sources and noscript fallbacks.

use crate::transform::dom::{Document, parse_selector};
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Lazy-load attributes holding an image source, most preferred first.
const IMAGE_SRC_CANDIDATES: &[&str] = &[
	"data-src",
	"data-original",
	"data-orig",
	"data-url",
	"data-orig-file",
	"data-large-file",
	"data-medium-file",
	"data-original-mos",
	"data-2000src",
	"data-1000src",
	"data-800src",
	"data-655src",
	"data-500src",
	"data-380src",
];

/// Lazy-load attributes holding an image srcset, most preferred first.
const IMAGE_SRCSET_CANDIDATES: &[&str] = &["data-srcset"];

/// Lazy-load attributes holding an iframe source, most preferred first.
const IFRAME_SRC_CANDIDATES: &[&str] = &[
	"data-src",
	"data-original",
	"data-orig",
	"data-url",
	"data-lazy-src",
];

fn first_candidate(doc: &Document, id: ego_tree::NodeId, candidates: &[&str]) -> Option<String> {
	candidates
		.iter()
		.find_map(|name| doc.attr(id, name))
		.map(str::to_string)
}

/// Wrap every titled image in a figure whose caption is the title.
pub fn add_image_title(content: String) -> String {
	let Some(titled) = parse_selector("img[src][title]") else {
		return content;
	};

	let mut doc = Document::parse(&content);
	let images = doc.select(&titled);
	if images.is_empty() {
		return content;
	}

	for img in images {
		let figure = format!(
			r#"<figure><img src="{}" alt="{}"/><figcaption><p>{}</p></figcaption></figure>"#,
			encode_double_quoted_attribute(doc.attr(img, "src").unwrap_or_default()),
			encode_double_quoted_attribute(doc.attr(img, "alt").unwrap_or_default()),
			encode_text(doc.attr(img, "title").unwrap_or_default()),
		);
		doc.replace_with_html(img, &figure);
	}

	doc.body_html()
}

/// Promote lazy-load attributes on images (and image placeholder divs) to
/// real `src`/`srcset` values. When nothing was lazy, unwrap noscript blocks
/// holding a single image instead.
pub fn add_dynamic_image(content: String) -> String {
	let (Some(lazy), Some(noscripts), Some(images)) = (
		parse_selector("img,div"),
		parse_selector("noscript"),
		parse_selector("img"),
	) else {
		return content;
	};

	let mut doc = Document::parse(&content);
	let mut changed = false;

	for id in doc.select(&lazy) {
		let src = first_candidate(&doc, id, IMAGE_SRC_CANDIDATES);
		let srcset = first_candidate(&doc, id, IMAGE_SRCSET_CANDIDATES);
		if src.is_none() && srcset.is_none() {
			continue;
		}
		changed = true;

		if doc.is_named(id, "img") {
			if let Some(src) = src {
				doc.set_attr(id, "src", &src);
			}
			if let Some(srcset) = srcset {
				doc.set_attr(id, "srcset", &srcset);
			}
			continue;
		}

		let mut img = String::from("<img");
		if let Some(src) = src {
			img.push_str(&format!(r#" src="{}""#, encode_double_quoted_attribute(&src)));
		}
		if let Some(srcset) = srcset {
			img.push_str(&format!(r#" srcset="{}""#, encode_double_quoted_attribute(&srcset)));
		}
		img.push_str(&format!(
			r#" alt="{}"/>"#,
			encode_double_quoted_attribute(doc.attr(id, "alt").unwrap_or_default())
		));
		doc.replace_with_html(id, &img);
	}

	if !changed {
		for noscript in doc.select(&noscripts) {
			if doc.select_within(noscript, &images).len() == 1 {
				doc.unwrap(noscript);
				changed = true;
			}
		}
	}

	if changed { doc.body_html() } else { content }
}

/// Promote lazy-load attributes on iframes to `src`.
pub fn add_dynamic_iframe(content: String) -> String {
	let Some(iframes) = parse_selector("iframe") else {
		return content;
	};

	let mut doc = Document::parse(&content);
	let mut changed = false;

	for id in doc.select(&iframes) {
		if let Some(src) = first_candidate(&doc, id, IFRAME_SRC_CANDIDATES) {
			doc.set_attr(id, "src", &src);
			changed = true;
		}
	}

	if changed { doc.body_html() } else { content }
}

/// Replace Medium's placeholder figures with the full image from their noscript.
pub fn fix_medium_images(content: String) -> String {
	let (Some(figures), Some(noscripts)) = (
		parse_selector("figure.paragraph-image"),
		parse_selector("noscript"),
	) else {
		return content;
	};

	let mut doc = Document::parse(&content);

	for figure in doc.select(&figures) {
		let fallbacks = doc.select_within(figure, &noscripts);
		if fallbacks.is_empty() {
			continue;
		}

		let markup: String = fallbacks.iter().map(|&id| doc.inner_html(id)).collect();
		doc.replace_with_html(figure, &markup);
	}

	doc.body_html()
}

/// In figures carrying both an image and a noscript fallback, keep only the
/// fallback markup.
pub fn use_noscript_figure_images(content: String) -> String {
	let (Some(figures), Some(images), Some(noscripts)) = (
		parse_selector("figure"),
		parse_selector("img"),
		parse_selector("noscript"),
	) else {
		return content;
	};

	let mut doc = Document::parse(&content);

	for figure in doc.select(&figures) {
		let imgs = doc.select_within(figure, &images);
		let fallbacks = doc.select_within(figure, &noscripts);
		if imgs.is_empty() || fallbacks.is_empty() {
			continue;
		}

		let markup: String = fallbacks.iter().map(|&id| doc.inner_html(id)).collect();
		doc.prepend_html(figure, &markup);

		for id in imgs.into_iter().chain(fallbacks) {
			doc.remove(id);
		}
	}

	doc.body_html()
}

/// Drop the query string of image sources that request a blurred rendition
/// (`blur` parameter with a positive value).
pub fn remove_img_blur_params(content: String) -> String {
	let Some(images) = parse_selector("img[src]") else {
		return content;
	};

	let mut doc = Document::parse(&content);
	let mut changed = false;

	for id in doc.select(&images) {
		let Some(src) = doc.attr(id, "src") else {
			continue;
		};
		let Ok(mut url) = url::Url::parse(src) else {
			continue;
		};

		let blurred = url.query_pairs().any(|(key, value)| {
			key == "blur" && value.parse::<f64>().is_ok_and(|blur| blur > 0.0)
		});
		if blurred {
			url.set_query(None);
			doc.set_attr(id, "src", url.as_str());
			changed = true;
		}
	}

	if changed { doc.body_html() } else { content }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_add_image_title() {
		let output = add_image_title(r#"<img src="pif" title="pouf">"#.to_string());
		assert_eq!(
			output,
			r#"<figure><img alt="" src="pif"><figcaption><p>pouf</p></figcaption></figure>"#
		);
	}

	#[test]
	fn test_add_image_title_escapes_attributes() {
		let output = add_image_title(
			r#"<img src="pif" title="pouf" alt='"onerror=alert(1) a="'><img src="pif" alt="pouf" title="<b>bold</b>">"#
				.to_string(),
		);
		assert!(!output.contains("onerror=\"alert(1)\""));
		assert!(output.contains(r#"alt="&quot;onerror=alert(1) a=&quot;""#));
		assert!(output.contains("<p>&lt;b&gt;bold&lt;/b&gt;</p>"));
	}

	#[test]
	fn test_add_image_title_without_title_is_untouched() {
		let input = r#"<img src="pif" alt="pouf"/>"#.to_string();
		assert_eq!(add_image_title(input.clone()), input);
	}

	#[test]
	fn test_add_dynamic_image_without_lazy_image() {
		let input =
			r#"<img src="https://example.org/image.jpg" alt="Image"><noscript><p>Some text</p></noscript>"#
				.to_string();
		assert_eq!(add_dynamic_image(input.clone()), input);
	}

	#[test]
	fn test_add_dynamic_image_promotes_candidate() {
		let output = add_dynamic_image(
			r#"<img src="" data-url="https://example.org/image.jpg" alt="Image"><noscript><img src="https://example.org/fallback.jpg" alt="Fallback"></noscript>"#
				.to_string(),
		);
		assert_eq!(
			output,
			r#"<img alt="Image" data-url="https://example.org/image.jpg" src="https://example.org/image.jpg"><noscript><img alt="Fallback" src="https://example.org/fallback.jpg"></noscript>"#
		);
	}

	#[test]
	fn test_add_dynamic_image_candidate_priority() {
		let output = add_dynamic_image(
			r#"<img data-380src="small.jpg" data-orig="orig.jpg" data-original="original.jpg">"#
				.to_string(),
		);
		assert!(output.contains(r#"src="original.jpg""#));
	}

	#[test]
	fn test_add_dynamic_image_replaces_div() {
		let output = add_dynamic_image(
			r#"<div data-url="https://example.org/image.jpg" alt="Image"></div><noscript><img src="https://example.org/fallback.jpg" alt="Fallback"></noscript>"#
				.to_string(),
		);
		assert_eq!(
			output,
			r#"<img alt="Image" src="https://example.org/image.jpg"><noscript><img alt="Fallback" src="https://example.org/fallback.jpg"></noscript>"#
		);
	}

	#[test]
	fn test_add_dynamic_image_srcset() {
		let output = add_dynamic_image(
			r#"<img src="meow" srcset="" data-srcset="https://example.org/image.jpg" alt="Image">"#
				.to_string(),
		);
		assert_eq!(
			output,
			r#"<img alt="Image" data-srcset="https://example.org/image.jpg" src="meow" srcset="https://example.org/image.jpg">"#
		);
	}

	#[test]
	fn test_add_dynamic_image_unwraps_noscript_fallback() {
		let output = add_dynamic_image(
			r#"<img src="" data-non-candidate="https://example.org/image.jpg" alt="Image"><noscript><img src="https://example.org/fallback.jpg" alt="Fallback"></noscript>"#
				.to_string(),
		);
		assert_eq!(
			output,
			r#"<img alt="Image" data-non-candidate="https://example.org/image.jpg" src=""><img alt="Fallback" src="https://example.org/fallback.jpg">"#
		);
	}

	#[test]
	fn test_add_dynamic_image_keeps_noscript_with_several_images() {
		let input = r#"<noscript><img src="a.jpg"><img src="b.jpg"></noscript>"#.to_string();
		assert_eq!(add_dynamic_image(input.clone()), input);
	}

	#[test]
	fn test_add_dynamic_iframe() {
		let output = add_dynamic_iframe(
			r#"<iframe src="about:blank" data-src="https://example.org/embed" allowfullscreen></iframe>"#
				.to_string(),
		);
		assert_eq!(
			output,
			r#"<iframe allowfullscreen="" data-src="https://example.org/embed" src="https://example.org/embed"></iframe>"#
		);
	}

	#[test]
	fn test_add_dynamic_iframe_without_lazy_source() {
		let input =
			r#"<iframe src="https://example.org/embed" allowfullscreen></iframe>"#.to_string();
		assert_eq!(add_dynamic_iframe(input.clone()), input);
	}

	#[test]
	fn test_fix_medium_images() {
		let output = fix_medium_images(
			r#"<figure class="paragraph-image"><div><img src="https://miro.medium.com/max/60/a.jpeg?q=20"></div><noscript><img alt="Image for post" src="https://miro.medium.com/max/2560/a.jpeg"></noscript></figure>"#
				.to_string(),
		);
		assert_eq!(
			output,
			r#"<img alt="Image for post" src="https://miro.medium.com/max/2560/a.jpeg">"#
		);
	}

	#[test]
	fn test_fix_medium_images_without_noscript() {
		let output = fix_medium_images(
			r#"<figure class="paragraph-image"><img src="a.jpeg"></figure>"#.to_string(),
		);
		assert_eq!(output, r#"<figure class="paragraph-image"><img src="a.jpeg"></figure>"#);
	}

	#[test]
	fn test_use_noscript_figure_images() {
		let output = use_noscript_figure_images(
			r#"<figure><img src="https://developer.mozilla.org/static/img/favicon144.png" alt="The beautiful MDN logo."><noscript><img src="http://example.org/logo.svg"></noscript><figcaption>MDN Logo</figcaption></figure>"#
				.to_string(),
		);
		assert_eq!(
			output,
			r#"<figure><img src="http://example.org/logo.svg"><figcaption>MDN Logo</figcaption></figure>"#
		);
	}

	#[test]
	fn test_use_noscript_figure_images_without_noscript() {
		let output = use_noscript_figure_images(
			r#"<figure><img src="logo.png" alt="Logo"><figcaption>MDN Logo</figcaption></figure>"#
				.to_string(),
		);
		assert_eq!(
			output,
			r#"<figure><img alt="Logo" src="logo.png"><figcaption>MDN Logo</figcaption></figure>"#
		);
	}

	#[test]
	fn test_remove_img_blur_params() {
		let output = remove_img_blur_params(
			r#"<img src="https://example.org/test1.jpg?blur=0&width=300" alt="zero"><img src="https://example.org/test2.jpg?size=large&blur=50&format=webp" alt="fifty"><img src="https://example.org/test3.jpg?BLUR=60&width=300" alt="upper">"#
				.to_string(),
		);
		assert_eq!(
			output,
			r#"<img alt="zero" src="https://example.org/test1.jpg?blur=0&amp;width=300"><img alt="fifty" src="https://example.org/test2.jpg"><img alt="upper" src="https://example.org/test3.jpg?BLUR=60&amp;width=300">"#
		);
	}

	#[test]
	fn test_remove_img_blur_params_no_images() {
		let input = "<p>No images here</p>\n<a href=\"https://example.org\">A link</a>".to_string();
		assert_eq!(remove_img_blur_params(input.clone()), input);
	}
}
