//! Element tree used by the transformer to query and edit a document.

use std::sync::LazyLock;

use ego_tree::NodeId;
use scraper::node::Text;
use scraper::{Html, Node, Selector};

static HEAD_SELECTOR: LazyLock<Selector> =
  LazyLock::new(|| Selector::parse("head").expect("invalid head selector"));

/// Handle identifying one element of a [`Markup`] tree.
///
/// Handles stay valid while other nodes are removed, which lets removal target exactly
/// the elements a query returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHandle(NodeId);

/// Parsed HTML document supporting selector queries and in-place edits.
pub struct Markup {
  html: Html,
}

impl Markup {
  /// Parse a full document. Malformed markup is corrected by the parser, never rejected.
  pub fn parse(content: &str) -> Self {
    Self {
      html: Html::parse_document(content),
    }
  }

  /// Elements matching `selector`, in source order.
  ///
  /// Source order is the order the parser created the elements in. It differs from tree
  /// order only for foster-parented content, e.g. a script written inside a `<table>`.
  pub fn select(&self, selector: &Selector) -> Vec<ElementHandle> {
    self
      .html
      .select(selector)
      .map(|element| ElementHandle(element.id()))
      .collect()
  }

  /// Read an attribute of an element still attached to the tree.
  pub fn attr(&self, handle: ElementHandle, name: &str) -> Option<&str> {
    self
      .html
      .tree
      .get(handle.0)
      .and_then(|node| node.value().as_element())
      .and_then(|element| element.attr(name))
  }

  /// Detach an element (and its subtree) from the document.
  pub fn remove(&mut self, handle: ElementHandle) {
    if let Some(mut node) = self.html.tree.get_mut(handle.0) {
      node.detach();
    }
  }

  /// Append `<tag type="...">body</tag>` as the last child of `<head>`.
  ///
  /// Returns the handle of the new element. The parser always synthesizes a `<head>`, so
  /// `None` only guards against a tree that was edited to lose it.
  pub fn append_to_head(&mut self, tag: &str, type_attr: &str, body: &str) -> Option<ElementHandle> {
    let head = self.html.select(&HEAD_SELECTOR).next()?.id();
    let element = inline_element(tag, type_attr)?;

    let mut head = self.html.tree.get_mut(head)?;
    let mut inserted = head.append(element);
    if !body.is_empty() {
      inserted.append(Node::Text(Text { text: body.into() }));
    }

    Some(ElementHandle(inserted.id()))
  }

  /// Serialize the tree back to markup.
  pub fn serialize(&self) -> String {
    self.html.html()
  }
}

/// Build an empty element node by parsing it as a fragment, so the node carries the same
/// namespace and attribute representation as parsed ones.
fn inline_element(tag: &str, type_attr: &str) -> Option<Node> {
  let escaped = type_attr.replace('&', "&amp;").replace('"', "&quot;");
  let template = Html::parse_fragment(&format!(r#"<{tag} type="{escaped}"></{tag}>"#));

  template
    .tree
    .values()
    .find(|node| node.as_element().is_some_and(|element| element.name() == tag))
    .cloned()
}
