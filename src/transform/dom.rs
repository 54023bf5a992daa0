//! Mutable HTML document used by the content transformations.
//!
//! Content is parsed as a full document with scripting disabled, so markup
//! inside `<noscript>` becomes real elements. Transformations select node ids,
//! edit the tree through this wrapper and serialize the body back out.

use ego_tree::NodeId;
use html5ever::driver::{self, ParseOpts};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{LocalName, QualName, local_name, namespace_url, ns};
use scraper::node::Text;
use scraper::{ElementRef, Html, HtmlTreeSink, Node, Selector};

/// Compile a CSS selector, logging and returning `None` when it is invalid.
pub fn parse_selector(selector: &str) -> Option<Selector> {
	match Selector::parse(selector) {
		Ok(parsed) => Some(parsed),
		Err(err) => {
			tracing::debug!(selector, error = %err, "Invalid CSS selector");
			None
		}
	}
}

fn parse_opts() -> ParseOpts {
	ParseOpts {
		tree_builder: TreeBuilderOpts {
			scripting_enabled: false,
			..Default::default()
		},
		..Default::default()
	}
}

pub struct Document {
	html: Html,
}

impl Document {
	pub fn parse(content: &str) -> Self {
		let html = driver::parse_document(HtmlTreeSink::new(Html::new_document()), parse_opts())
			.one(content);
		Document { html }
	}

	fn body(&self) -> Option<ElementRef<'_>> {
		self.html
			.root_element()
			.children()
			.filter_map(ElementRef::wrap)
			.find(|element| element.value().name() == "body")
	}

	/// Serialized children of `<body>`.
	pub fn body_html(&self) -> String {
		self.body()
			.map(|body| body.inner_html())
			.unwrap_or_default()
	}

	/// Attached elements matching `selector`, in document order.
	pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
		self.html
			.root_element()
			.select(selector)
			.map(|element| element.id())
			.collect()
	}

	/// First attached element matching `selector`.
	pub fn select_first(&self, selector: &Selector) -> Option<NodeId> {
		self.html
			.root_element()
			.select(selector)
			.next()
			.map(|element| element.id())
	}

	/// Descendants of `id` matching `selector`, excluding `id` itself.
	pub fn select_within(&self, id: NodeId, selector: &Selector) -> Vec<NodeId> {
		self.element(id)
			.map(|element| {
				element
					.select(selector)
					.map(|found| found.id())
					.filter(|&found| found != id)
					.collect()
			})
			.unwrap_or_default()
	}

	pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
		self.html.tree.get(id).and_then(ElementRef::wrap)
	}

	pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
		self.element(id).and_then(|element| element.attr(name))
	}

	pub fn is_named(&self, id: NodeId, name: &str) -> bool {
		self.element(id)
			.is_some_and(|element| element.value().name() == name)
	}

	/// Concatenated text of all descendant text nodes.
	pub fn text(&self, id: NodeId) -> String {
		self.element(id)
			.map(|element| element.text().collect())
			.unwrap_or_default()
	}

	pub fn inner_html(&self, id: NodeId) -> String {
		self.element(id)
			.map(|element| element.inner_html())
			.unwrap_or_default()
	}

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.html
			.tree
			.get(id)
			.and_then(|node| node.parent())
			.map(|parent| parent.id())
	}

	/// Next sibling that carries content: an element or non-blank text.
	/// Whitespace-only text and comments are skipped.
	pub fn next_content_sibling(&self, id: NodeId) -> Option<NodeId> {
		let node = self.html.tree.get(id)?;
		node.next_siblings()
			.find(|sibling| match sibling.value() {
				Node::Element(_) => true,
				Node::Text(text) => !text.trim().is_empty(),
				_ => false,
			})
			.map(|sibling| sibling.id())
	}

	/// Text nodes below `id`, in document order.
	pub fn descendant_texts(&self, id: NodeId) -> Vec<NodeId> {
		self.html
			.tree
			.get(id)
			.map(|node| {
				node.descendants()
					.filter(|descendant| descendant.value().is_text())
					.map(|descendant| descendant.id())
					.collect()
			})
			.unwrap_or_default()
	}

	pub fn text_content(&self, id: NodeId) -> Option<&str> {
		self.html
			.tree
			.get(id)
			.and_then(|node| node.value().as_text())
			.map(|text| &**text)
	}

	pub fn set_text(&mut self, id: NodeId, value: &str) {
		if let Some(mut node) = self.html.tree.get_mut(id)
			&& node.value().is_text()
		{
			*node.value() = Node::Text(Text {
				text: StrTendril::from_slice(value),
			});
		}
	}

	/// Set an attribute, keeping the element's attribute list sorted by name.
	pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
		let Some(mut node) = self.html.tree.get_mut(id) else {
			return;
		};
		let Node::Element(element) = node.value() else {
			return;
		};

		let name = QualName::new(None, ns!(), LocalName::from(name));
		let value = StrTendril::from_slice(value);
		match element.attrs.binary_search_by(|(attr, _)| attr.cmp(&name)) {
			Ok(index) => element.attrs[index].1 = value,
			Err(index) => element.attrs.insert(index, (name, value)),
		}
	}

	pub fn remove(&mut self, id: NodeId) {
		if let Some(mut node) = self.html.tree.get_mut(id) {
			node.detach();
		}
	}

	/// Replace the node with its own children.
	pub fn unwrap(&mut self, id: NodeId) {
		let children: Vec<NodeId> = match self.html.tree.get(id) {
			Some(node) => node.children().map(|child| child.id()).collect(),
			None => return,
		};

		if let Some(mut node) = self.html.tree.get_mut(id) {
			for child in children {
				node.insert_id_before(child);
			}
			node.detach();
		}
	}

	/// Insert `markup` before the node, returning the inserted top-level nodes.
	pub fn insert_html_before(&mut self, id: NodeId, markup: &str) -> Vec<NodeId> {
		let Some(parent) = self.parent(id) else {
			return Vec::new();
		};
		let nodes = self.graft(parent, markup);

		if let Some(mut target) = self.html.tree.get_mut(id) {
			for &node in &nodes {
				target.insert_id_before(node);
			}
		}
		nodes
	}

	pub fn replace_with_html(&mut self, id: NodeId, markup: &str) {
		self.insert_html_before(id, markup);
		self.remove(id);
	}

	pub fn append_html(&mut self, id: NodeId, markup: &str) {
		let nodes = self.graft(id, markup);

		if let Some(mut target) = self.html.tree.get_mut(id) {
			for node in nodes {
				target.append_id(node);
			}
		}
	}

	pub fn prepend_html(&mut self, id: NodeId, markup: &str) {
		let nodes = self.graft(id, markup);

		if let Some(mut target) = self.html.tree.get_mut(id) {
			for node in nodes.into_iter().rev() {
				target.prepend_id(node);
			}
		}
	}

	/// Parse `markup` as the content of the `context` element and copy the
	/// result into this tree. Returns the top-level nodes, still detached
	/// from the document.
	fn graft(&mut self, context: NodeId, markup: &str) -> Vec<NodeId> {
		let context_name = self
			.element(context)
			.map(|element| element.value().name.clone())
			.unwrap_or_else(|| QualName::new(None, ns!(html), local_name!("body")));

		let fragment = driver::parse_fragment(
			HtmlTreeSink::new(Html::new_fragment()),
			parse_opts(),
			context_name,
			Vec::new(),
		)
		.one(markup);

		let root = self.html.tree.extend_tree(fragment.tree).id();

		// Fragment parsing wraps the parsed nodes in a single <html> element.
		self.html
			.tree
			.get(root)
			.and_then(|root| root.children().find(|child| child.value().is_element()))
			.map(|wrapper| wrapper.children().map(|child| child.id()).collect())
			.unwrap_or_default()
	}
}
