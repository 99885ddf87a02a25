//! Small accessors over the `markup5ever_rcdom` tree.

use markup5ever_rcdom::{Handle, NodeData};

/// Local tag name of an element node.
pub fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub fn attr(node: &Handle, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == key)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

pub fn text_of(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// Element children, in document order.
pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|c| tag_name(c).is_some())
        .cloned()
        .collect()
}

/// First descendant element with the given tag, depth first.
pub fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        if tag_name(child) == Some(tag) {
            return Some(child.clone());
        }
        if let Some(found) = find_element(child, tag) {
            return Some(found);
        }
    }
    None
}

/// Value of a single CSS property from an inline `style` attribute.
pub fn style_property(node: &Handle, property: &str) -> Option<String> {
    let style = attr(node, "style")?;
    style.split(';').find_map(|decl| {
        let (key, value) = decl.split_once(':')?;
        (key.trim().eq_ignore_ascii_case(property)).then(|| value.trim().to_ascii_lowercase())
    })
}

/// Concatenated text of every descendant text node, untouched.
pub fn raw_text(node: &Handle) -> String {
    fn walk(node: &Handle, out: &mut String) {
        if let Some(text) = text_of(node) {
            out.push_str(&text);
        }
        for child in node.children.borrow().iter() {
            walk(child, out);
        }
    }
    let mut out = String::new();
    walk(node, &mut out);
    out
}
