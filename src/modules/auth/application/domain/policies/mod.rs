mod access_policy;

pub use access_policy::{Access, Denial, Policy, Principal};
