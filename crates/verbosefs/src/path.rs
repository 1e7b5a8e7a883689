use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path.
///
/// `.` components are dropped and `..` removes the preceding normal
/// component. A `..` directly under the root is dropped; leading `..`
/// components of a relative path are kept. Symbolic links are not consulted.
pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    _ = components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }
    components.into_iter().collect()
}

/// Absolute, lexically normalized form of `path`.
///
/// Relative paths, including the empty path, resolve against the current
/// working directory. If that cannot be determined the path is normalized as
/// given.
pub fn absolute_normalized<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let resolved = if path.as_os_str().is_empty() {
        std::env::current_dir()
    } else {
        std::path::absolute(path)
    };
    match resolved {
        Ok(abs) => normalize(abs),
        Err(_) => normalize(path),
    }
}

/// String form used in audit messages
pub fn display<P: AsRef<Path>>(path: P) -> String {
    absolute_normalized(path).display().to_string()
}
