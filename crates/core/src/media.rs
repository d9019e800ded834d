//! Upload allow-lists, storage names, and public URLs.

use rand::Rng;

/// Bytes in one mebibyte.
pub const MIB: usize = 1024 * 1024;

/// Default ceiling for image uploads.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 4 * MIB;

/// Default ceiling for video uploads.
pub const DEFAULT_MAX_VIDEO_BYTES: usize = 20 * MIB;

/// Path segment under which stored files are served.
pub const UPLOADS_SEGMENT: &str = "/uploads/";

const RANDOM_SUFFIX_LEN: usize = 10;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The two upload endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Accepted MIME types with the extension each one is stored under.
    pub fn allowed_types(self) -> &'static [(&'static str, &'static str)] {
        match self {
            MediaKind::Image => &[
                ("image/jpeg", "jpg"),
                ("image/png", "png"),
                ("image/webp", "webp"),
                ("image/avif", "avif"),
            ],
            MediaKind::Video => &[
                ("video/mp4", "mp4"),
                ("video/webm", "webm"),
                ("video/quicktime", "mov"),
            ],
        }
    }

    /// Multipart field carrying the file.
    pub fn field_name(self) -> &'static str {
        match self {
            MediaKind::Image => "file",
            MediaKind::Video => "video",
        }
    }

    /// Storage extension for `mime`, or `None` when it is not allowed.
    pub fn extension_for(self, mime: &str) -> Option<&'static str> {
        let mime = mime.trim().to_ascii_lowercase();
        // Drop parameters such as `; charset=...`.
        let essence = mime.split(';').next().unwrap_or_default().trim();
        self.allowed_types()
            .iter()
            .find(|(m, _)| *m == essence)
            .map(|(_, ext)| *ext)
    }

    /// Comma-separated allow-list, for rejection messages.
    pub fn allowed_list(self) -> String {
        self.allowed_types()
            .iter()
            .map(|(m, _)| *m)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Whether an image extension gets resized variants. AVIF is stored as-is.
pub fn supports_variants(extension: &str) -> bool {
    matches!(extension, "jpg" | "png" | "webp")
}

/// `<millis>-<10 base36 chars>.<ext>`.
pub fn generate_filename(extension: &str, now_millis: i64) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{now_millis}-{suffix}.{extension}")
}

/// `<stem>-<width>w.webp` for a stored file name.
pub fn variant_filename(filename: &str, width: u32) -> String {
    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename);
    format!("{stem}-{width}w.webp")
}

/// `<base>/uploads/<file>`.
pub fn public_url(base_url: &str, filename: &str) -> String {
    format!("{}{UPLOADS_SEGMENT}{filename}", base_url.trim_end_matches('/'))
}

/// `"<url> <w>w, ..."`, ascending by width.
pub fn build_srcset(variants: &[(String, u32)]) -> String {
    let mut sorted: Vec<&(String, u32)> = variants.iter().collect();
    sorted.sort_by_key(|(_, w)| *w);
    sorted
        .iter()
        .map(|(url, w)| format!("{url} {w}w"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// File name of a locally stored upload referenced by `url`.
///
/// Returns `None` for remote or default images and for anything that is not a
/// plain file name (path separators, `.`/`..`).
pub fn local_upload_name(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once(UPLOADS_SEGMENT)?;
    let name = rest.split(['?', '#']).next().unwrap_or_default();
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    plain.then_some(name)
}

/// Names of the variants that may exist next to a stored image.
pub fn variant_filenames(filename: &str) -> Vec<String> {
    crate::image_variants::VARIANT_SPECS
        .iter()
        .map(|spec| variant_filename(filename, spec.width))
        .collect()
}
