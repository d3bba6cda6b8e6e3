use url::form_urlencoded;

const ONBOARDING_PATH: &str = "/onboarding";

/// Returns `requested` when it is a site-relative path, otherwise `fallback`.
pub(super) fn safe_redirect_target(requested: Option<&str>, fallback: &str) -> String {
    requested
        .map(str::trim)
        .filter(|target| is_site_relative(target))
        .unwrap_or(fallback)
        .to_owned()
}

/// Onboarding location that continues to `target` afterwards.
pub(super) fn onboarding_location(target: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirectTo", target)
        .finish();

    format!("{ONBOARDING_PATH}?{query}")
}

fn is_site_relative(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.chars().any(|character| character.is_control())
}

#[cfg(test)]
mod tests {
    use super::{onboarding_location, safe_redirect_target};

    #[test]
    fn site_relative_targets_are_kept() {
        assert_eq!(
            safe_redirect_target(Some("/dashboard/reports?range=7d"), "/dashboard"),
            "/dashboard/reports?range=7d"
        );
    }

    #[test]
    fn foreign_targets_fall_back() {
        for target in [
            "https://evil.example/dashboard",
            "//evil.example",
            "/\\evil.example",
            "javascript:alert(1)",
            "dashboard",
            "",
        ] {
            assert_eq!(safe_redirect_target(Some(target), "/dashboard"), "/dashboard");
        }
        assert_eq!(safe_redirect_target(None, "/dashboard"), "/dashboard");
    }

    #[test]
    fn onboarding_carries_encoded_target() {
        assert_eq!(
            onboarding_location("/dashboard?tab=calls"),
            "/onboarding?redirectTo=%2Fdashboard%3Ftab%3Dcalls"
        );
    }
}
