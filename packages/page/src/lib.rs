//! # Script Card Page
//!
//! Typed document model for script card pages.
//!
//! Markup arrives as a [`VNode`] tree. [`Page::build`] walks it once and
//! turns class and attribute conventions into explicit [`Binding`]
//! descriptors:
//!
//! | markup | binding |
//! |---|---|
//! | `<span class="customer_name">` | `Field { customerName }` |
//! | `<span class="manual-edit" data-default-text="ISSUE">` | `Peer { "ISSUE" }` |
//! | `<span data-default-text="[order]">` | `Placeholder` |
//!
//! Elements with class `script-card` become cards, `input.form-input`
//! elements become form controls and `.form-container` sections become
//! errand forms.

pub mod binding;
pub mod errand;
pub mod error;
pub mod field;
pub mod geometry;
pub mod page;
pub mod vnode;

pub use binding::Binding;
pub use errand::{ErrandFormSpec, ErrandInputSpec};
pub use error::PageError;
pub use field::{FieldName, UnknownField};
pub use geometry::{Anchor, Position, Rect, ScrollOffset, Size};
pub use page::{
    BindingIssue, Card, CardId, CardSnapshot, DisplayNode, FormControl, NodeContent, NodeId,
    NodeSnapshot, Page, PageSnapshot,
};
pub use vnode::{parse_markup, VNode};
