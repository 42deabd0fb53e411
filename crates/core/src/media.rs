//! Upload rules for the media library.

/// MIME types accepted by the upload endpoint.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/svg+xml",
    "image/x-icon",
    "image/vnd.microsoft.icon",
];

/// URL prefix under which stored uploads are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

pub fn is_allowed_mime_type(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

/// Derive the on-disk filename for an upload.
///
/// The client-supplied name is lowercased, every character outside
/// `[a-z0-9._-]` becomes a hyphen (runs collapsed), and a millisecond
/// timestamp is inserted before the extension so repeated uploads of the
/// same file never overwrite each other.
///
/// ```
/// use folio_core::media::stored_filename;
///
/// assert_eq!(stored_filename("My Photo.PNG", 1700000000000), "my-photo-1700000000000.png");
/// ```
pub fn stored_filename(original_name: &str, timestamp_millis: i64) -> String {
    let mut safe = String::with_capacity(original_name.len());
    for ch in original_name.chars().flat_map(char::to_lowercase) {
        let mapped = if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '.' | '_' | '-')
        {
            ch
        } else {
            '-'
        };
        if mapped == '-' && safe.ends_with('-') {
            continue;
        }
        safe.push(mapped);
    }

    // Only a dot after the first character starts an extension (".env" has none).
    let (stem, ext) = match safe.rfind('.') {
        Some(idx) if idx > 0 => safe.split_at(idx),
        _ => (safe.as_str(), ""),
    };

    format!("{stem}-{timestamp_millis}{ext}")
}

/// Public URL for a stored upload.
pub fn public_url(filename: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}/{filename}")
}
