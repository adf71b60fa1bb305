use thiserror::Error;

pub const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL",
    "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8", "COM9",
    "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reasons a string cannot be used as a single path component
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("name is empty")]
    Empty,

    #[error("contains invalid character {0:?}")]
    InvalidChar(char),

    #[error("'{0}' is a reserved device name")]
    Reserved(String),

    #[error("must not end with a space or dot")]
    TrailingDotOrSpace,
}

/// Returns the first character that may not appear in a file name, if any.
pub fn find_invalid_char(name: &str) -> Option<char> {
    name.chars()
        .find(|c| INVALID_CHARS.contains(c) || c.is_control())
}

/// Checks that `name` can be used verbatim as a file or folder name on every
/// platform the project may be opened on.
///
/// Unlike sanitising, nothing is rewritten: the caller gets the reason back.
pub fn validate_file_name(name: &str) -> Result<(), NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty);
    }

    if let Some(c) = find_invalid_char(name) {
        return Err(NameError::InvalidChar(c));
    }

    let upper = name.to_uppercase();
    let base = upper.split('.').next().unwrap_or("");
    if RESERVED_NAMES.contains(&base) {
        return Err(NameError::Reserved(name.to_string()));
    }

    if name.ends_with(' ') || name.ends_with('.') {
        return Err(NameError::TrailingDotOrSpace);
    }

    Ok(())
}

/// Splits `Rock.fbx` into `("Rock", Some("fbx"))`.
fn split_stem(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rfind('.') {
        Some(0) | None => (file_name, None),
        Some(pos) => (&file_name[..pos], Some(&file_name[pos + 1..])),
    }
}

/// Adds a numeric suffix to the stem: `Rock.fbx` -> `Rock 2.fbx`.
fn add_counter_to_filename(file_name: &str, counter: u32) -> String {
    match split_stem(file_name) {
        (stem, Some(ext)) => format!("{} {}.{}", stem, counter, ext),
        (stem, None) => format!("{} {}", stem, counter),
    }
}

/// Ensures the file name is unique in `folder` by adding a counter if needed.
///
/// `exists` is asked about full project-relative paths so the check goes
/// through whatever asset host the caller uses.
///
/// # Examples
///
/// ```
/// use assort::file::naming::ensure_unique_filename;
///
/// let taken = ["Assets/Art/Models/Rock.fbx", "Assets/Art/Models/Rock 1.fbx"];
/// let name = ensure_unique_filename("Assets/Art/Models", "Rock.fbx", |p| taken.contains(&p));
/// assert_eq!(name, "Rock 2.fbx");
/// ```
pub fn ensure_unique_filename<F>(folder: &str, file_name: &str, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let candidate = crate::util::paths::join_asset_path(folder, file_name);
    if !exists(&candidate) {
        return file_name.to_string();
    }

    let mut counter = 1;
    loop {
        let renamed = add_counter_to_filename(file_name, counter);
        let candidate = crate::util::paths::join_asset_path(folder, &renamed);
        if !exists(&candidate) {
            return renamed;
        }
        counter += 1;
    }
}
