pub mod nested_resource;
pub mod parents;

pub use nested_resource::{ChildCollection, NestedError, NestedResource, ParentLookup};
pub use parents::{CommentCollection, ReviewCollection, ReviewLookup, ReviewedTitle, TitleLookup};
