use crate::component::BoundValue;
use crate::data_model::DataModel;
use serde_json::Value;
use std::cell::RefCell;

/// Resolves bound properties against a data model for one render pass.
///
/// Every display value comes out as a `String`. Only list sources use
/// [`resolve_raw`](Resolver::resolve_raw) to get at the underlying sequence.
/// Paths that resolve to nothing are remembered so the render pass can report
/// them.
#[derive(Debug)]
pub struct Resolver<'a> {
    data: &'a DataModel,
    unbound: RefCell<Vec<String>>,
}

impl<'a> Resolver<'a> {
    pub fn new(data: &'a DataModel) -> Self {
        Self {
            data,
            unbound: RefCell::new(Vec::new()),
        }
    }

    /// Resolve to display text.
    ///
    /// Absent input is `""`, a literal is returned as-is, and a path is looked
    /// up with [`DataModel::read_text`]. A path that resolves to nothing is
    /// `""` as well, so callers cannot tell a missing key from an empty value.
    /// A key holding `null` reads as `"null"`.
    pub fn resolve(&self, bound: Option<&BoundValue>) -> String {
        match bound {
            None => String::new(),
            Some(BoundValue::Literal(text)) => text.clone(),
            Some(BoundValue::Path(path)) => {
                if self.data.read(path).is_none() {
                    self.note_unbound(path);
                }
                self.data.read_text(path)
            }
        }
    }

    /// Resolve only if the property is present.
    pub fn resolve_opt(&self, bound: Option<&BoundValue>) -> Option<String> {
        bound.map(|bound| self.resolve(Some(bound)))
    }

    /// `true` only when the resolved text is exactly `"true"`.
    pub fn resolve_flag(&self, bound: Option<&BoundValue>) -> bool {
        bound.is_some() && self.resolve(bound) == "true"
    }

    /// The raw data value behind a path binding.
    ///
    /// Literals and absent input have no raw value.
    pub fn resolve_raw(&self, bound: Option<&BoundValue>) -> Option<&'a Value> {
        match bound? {
            BoundValue::Literal(_) => None,
            BoundValue::Path(path) => {
                let value = self.data.read(path);
                if value.is_none() {
                    self.note_unbound(path);
                }
                value
            }
        }
    }

    /// Paths that resolved to nothing so far, in first-seen order.
    pub fn unbound_paths(&self) -> Vec<String> {
        self.unbound.borrow().clone()
    }

    fn note_unbound(&self, path: &str) {
        tracing::trace!(path, "unbound data path");
        let mut unbound = self.unbound.borrow_mut();
        if !unbound.iter().any(|seen| seen == path) {
            unbound.push(path.to_string());
        }
    }
}
