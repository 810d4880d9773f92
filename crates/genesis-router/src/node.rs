//! Radix tree node.
//!
//! Each node is one path segment. Nodes at a route boundary carry a
//! [`MethodRouter`].

use crate::method_router::MethodRouter;
use crate::params::Params;

/// Kind of path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal segment (`todos`)
    Static,
    /// Named parameter (`{id}`)
    Param(String),
    /// Catch-all (`*rest`), only valid as the last segment
    Wildcard(String),
}

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Segment text as written in the template
    pub segment: String,
    /// Segment kind
    pub kind: SegmentKind,
    /// Verb table when a route ends at this node
    pub methods: Option<MethodRouter>,
    /// Literal children, sorted for binary search
    pub static_children: Vec<Node>,
    /// Parameter child
    pub param_child: Option<Box<Node>>,
    /// Catch-all child
    pub wildcard_child: Option<Box<Node>>,
}

impl Node {
    fn with_kind(segment: String, kind: SegmentKind) -> Self {
        Self {
            segment,
            kind,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates the root node.
    #[must_use]
    pub fn root() -> Self {
        Self::with_kind(String::new(), SegmentKind::Static)
    }

    /// Inserts a route template, merging verbs into an existing node.
    pub fn insert(&mut self, path: &str, methods: MethodRouter) {
        let segments = Self::parse_path(path);
        self.insert_segments(&segments, methods);
    }

    /// Splits a template into typed segments.
    ///
    /// A `*name` segment anywhere but last is treated as a literal.
    fn parse_path(path: &str) -> Vec<(String, SegmentKind)> {
        let raw: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let last = raw.len().saturating_sub(1);
        raw.iter()
            .enumerate()
            .map(|(i, s)| {
                if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    ((*s).to_string(), SegmentKind::Param(name.to_string()))
                } else if let Some(name) = s.strip_prefix('*').filter(|_| i == last) {
                    ((*s).to_string(), SegmentKind::Wildcard(name.to_string()))
                } else {
                    ((*s).to_string(), SegmentKind::Static)
                }
            })
            .collect()
    }

    fn merge_methods(&mut self, methods: MethodRouter) {
        match &mut self.methods {
            Some(existing) => existing.merge(methods),
            None => self.methods = Some(methods),
        }
    }

    fn insert_segments(&mut self, segments: &[(String, SegmentKind)], methods: MethodRouter) {
        let Some(((segment, kind), remaining)) = segments.split_first() else {
            self.merge_methods(methods);
            return;
        };

        match kind {
            SegmentKind::Static => {
                if let Some(child) = self
                    .static_children
                    .iter_mut()
                    .find(|c| c.segment == *segment)
                {
                    child.insert_segments(remaining, methods);
                } else {
                    let mut child = Node::with_kind(segment.clone(), SegmentKind::Static);
                    child.insert_segments(remaining, methods);
                    self.static_children.push(child);
                    self.static_children.sort_by(|a, b| a.segment.cmp(&b.segment));
                }
            }
            SegmentKind::Param(name) => {
                let child = self.param_child.get_or_insert_with(|| {
                    Box::new(Node::with_kind(
                        format!("{{{name}}}"),
                        SegmentKind::Param(name.clone()),
                    ))
                });
                child.insert_segments(remaining, methods);
            }
            SegmentKind::Wildcard(name) => {
                let child = self.wildcard_child.get_or_insert_with(|| {
                    Box::new(Node::with_kind(
                        format!("*{name}"),
                        SegmentKind::Wildcard(name.clone()),
                    ))
                });
                child.merge_methods(methods);
            }
        }
    }

    /// Matches a request path, returning the verb table and captured params.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments<'a>(&'a self, segments: &[&str], params: &mut Params) -> Option<&'a MethodRouter> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        if let Some(child) = self.find_static_child(segment) {
            if let Some(found) = child.match_segments(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.clone(), (*segment).to_string());
                if let Some(found) = child.match_segments(remaining, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let SegmentKind::Wildcard(name) = &child.kind {
                params.push(name.clone(), segments.join("/"));
                return child.methods.as_ref();
            }
        }

        None
    }

    fn find_static_child(&self, segment: &str) -> Option<&Node> {
        self.static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
            .ok()
            .map(|i| &self.static_children[i])
    }
}
