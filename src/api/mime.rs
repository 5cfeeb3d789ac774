pub const PNG_ONLY: &[&str] = &["image/png"];
pub const RASTER_TYPES: &[&str] = &["image/png", "image/jpg", "image/jpeg"];

/// True iff every declared type is in `allowed`. No declared types passes.
pub fn is_allowed<S: AsRef<str>>(declared: &[S], allowed: &[&str]) -> bool {
    declared
        .iter()
        .all(|mime_type| allowed.contains(&mime_type.as_ref()))
}
