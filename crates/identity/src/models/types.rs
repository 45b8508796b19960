use std::sync::Arc;

/// Identity identifier issued by the hosting platform (usually numeric text).
pub type IdentityId = Arc<str>;
