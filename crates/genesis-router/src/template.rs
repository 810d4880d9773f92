//! Route template joining.

/// Joins a route root and a method template with exactly one `/`.
///
/// One leading `/` is stripped from both sides and one trailing `/` from the
/// root before joining. An empty root yields `"/{template}"` and an empty
/// template yields the root alone.
///
/// # Example
///
/// ```rust
/// use genesis_router::join_route_template;
///
/// assert_eq!(join_route_template("api/", "/todos"), "api/todos");
/// assert_eq!(join_route_template("api", "todos"), "api/todos");
/// assert_eq!(join_route_template("/api", "todos/{id}"), "api/todos/{id}");
/// assert_eq!(join_route_template("", "echo"), "/echo");
/// assert_eq!(join_route_template("api", ""), "api");
/// ```
#[must_use]
pub fn join_route_template(root: &str, template: &str) -> String {
    let root = root.strip_prefix('/').unwrap_or(root);
    let root = root.strip_suffix('/').unwrap_or(root);
    let template = template.strip_prefix('/').unwrap_or(template);
    if template.is_empty() {
        return root.to_string();
    }
    format!("{root}/{template}")
}

/// Normalizes a template into a router path with a single leading `/`.
///
/// ```rust
/// use genesis_router::normalize_path;
///
/// assert_eq!(normalize_path("api/echo"), "/api/echo");
/// assert_eq!(normalize_path("/api/echo"), "/api/echo");
/// ```
#[must_use]
pub fn normalize_path(template: &str) -> String {
    if template.starts_with('/') {
        template.to_string()
    } else {
        format!("/{template}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_join_strips_stray_separators() {
        assert_eq!(join_route_template("api/", "/todos"), "api/todos");
        assert_eq!(join_route_template("/api/", "/todos"), "api/todos");
    }

    #[test]
    fn test_join_plain() {
        assert_eq!(join_route_template("api", "todos"), "api/todos");
        assert_eq!(join_route_template("api", "echo/static"), "api/echo/static");
    }

    #[test]
    fn test_join_empty_root() {
        assert_eq!(join_route_template("", "todos"), "/todos");
        assert_eq!(join_route_template("", "/todos"), "/todos");
    }

    #[test]
    fn test_join_empty_template_maps_root() {
        assert_eq!(join_route_template("api", ""), "api");
        assert_eq!(join_route_template("/api/", "/"), "api");
        assert_eq!(normalize_path(&join_route_template("", "")), "/");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/todos"), "/todos");
        assert_eq!(normalize_path("todos"), "/todos");
    }

    proptest! {
        #[test]
        fn prop_single_separator(root in "[a-z]{1,8}", template in "[a-z]{1,8}") {
            let expected = format!("{root}/{template}");
            for r in [root.clone(), format!("/{root}"), format!("{root}/"), format!("/{root}/")] {
                for t in [template.clone(), format!("/{template}")] {
                    prop_assert_eq!(join_route_template(&r, &t), expected.clone());
                }
            }
        }
    }
}
