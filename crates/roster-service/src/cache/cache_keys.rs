//! Cache key names.

/// Key holding the serialized list of all users.
pub const USER_LIST: &str = "roster:cache:users";
