/// Turns a user-supplied path into a vault logical path: forward slashes, no
/// leading `./`, no leading or trailing separator.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut trimmed = path.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    if trimmed == "." {
        return String::new();
    }
    trimmed.trim_matches('/').to_owned()
}

/// Leaf label of a logical path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Parent folder of a logical path; the vault root is `""`.
pub fn parent_path(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((parent, _)) => parent,
        None => "",
    }
}

pub fn join_path(folder: &str, name: &str) -> String {
    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        name.to_owned()
    } else {
        format!("{}/{}", folder, name)
    }
}

/// Lowercased extension without the dot; empty when the name has none.
pub fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_user_paths() {
        assert_eq!(normalize_path("./Notes/daily/"), "Notes/daily");
        assert_eq!(normalize_path("Notes\\daily\\a.md"), "Notes/daily/a.md");
        assert_eq!(normalize_path("."), "");
        assert_eq!(normalize_path("/"), "");
    }

    #[test]
    fn splits_logical_paths() {
        assert_eq!(file_name("a/b/c.md"), "c.md");
        assert_eq!(file_name("c.md"), "c.md");
        assert_eq!(parent_path("a/b/c.md"), "a/b");
        assert_eq!(parent_path("c.md"), "");
        assert_eq!(join_path("Exports/", "out.md"), "Exports/out.md");
        assert_eq!(join_path("", "out.md"), "out.md");
    }

    #[test]
    fn extracts_lowercase_extension() {
        assert_eq!(extension_of("Readme.MD"), "md");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".gitignore"), "");
    }
}
