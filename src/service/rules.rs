//! Human-readable access rules

use crate::domain::PolicyRule;

/// Formats one rule as a single line.
///
/// Field order is fixed: verbs, resources, `"resourceNames"`,
/// nonResourceURLs, `(apiGroups)`. A field is shown when its list is
/// non-empty, so the core API group `[""]` renders as `()`.
pub fn format_rule(rule: &PolicyRule) -> String {
    let mut line = join(&rule.verbs);

    if has_values(&rule.resources) {
        line.push(' ');
        line.push_str(&join(&rule.resources));
    }
    if has_values(&rule.resource_names) {
        line.push_str(&format!(" \"{}\"", join(&rule.resource_names)));
    }
    if has_values(&rule.non_resource_urls) {
        line.push(' ');
        line.push_str(&join(&rule.non_resource_urls));
    }
    if has_values(&rule.api_groups) {
        line.push_str(&format!(" ({})", join(&rule.api_groups)));
    }
    line
}

/// Formats every rule, one `\n`-terminated line each.
pub fn format_rules<'a>(rules: impl IntoIterator<Item = &'a PolicyRule>) -> String {
    rules
        .into_iter()
        .map(|rule| format_rule(rule) + "\n")
        .collect()
}

fn has_values(values: &Option<Vec<String>>) -> bool {
    values.as_ref().is_some_and(|v| !v.is_empty())
}

fn join(values: &Option<Vec<String>>) -> String {
    values.as_deref().unwrap_or_default().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn strings(values: &[&str]) -> Option<Vec<String>> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    #[rstest]
    #[case(&["get"], "get")]
    #[case(&["get", "list", "watch"], "get,list,watch")]
    #[case(&["*"], "*")]
    fn test_verbs_only(#[case] verbs: &[&str], #[case] expected: &str) {
        let rule = PolicyRule {
            verbs: strings(verbs),
            ..Default::default()
        };
        assert_eq!(format_rule(&rule), expected);
    }

    #[test]
    fn test_verbs_and_resources() {
        let rule = PolicyRule {
            verbs: strings(&["get"]),
            resources: strings(&["pods", "pods/log"]),
            ..Default::default()
        };
        assert_eq!(format_rule(&rule), "get pods,pods/log");
    }

    #[test]
    fn test_core_api_group_renders_empty_parens() {
        let rule = PolicyRule {
            verbs: strings(&["get", "list"]),
            resources: strings(&["pods"]),
            api_groups: strings(&[""]),
            ..Default::default()
        };
        assert_eq!(format_rule(&rule), "get,list pods ()");
    }

    #[test]
    fn test_named_api_groups() {
        let rule = PolicyRule {
            verbs: strings(&["create"]),
            resources: strings(&["deployments"]),
            api_groups: strings(&["apps", "extensions"]),
            ..Default::default()
        };
        assert_eq!(format_rule(&rule), "create deployments (apps,extensions)");
    }

    #[test]
    fn test_verbs_and_non_resource_urls() {
        let rule = PolicyRule {
            verbs: strings(&["get"]),
            non_resource_urls: strings(&["/healthz", "/metrics"]),
            ..Default::default()
        };
        assert_eq!(format_rule(&rule), "get /healthz,/metrics");
    }

    #[test]
    fn test_all_fields_in_fixed_order() {
        let rule = PolicyRule {
            api_groups: strings(&[""]),
            resource_names: strings(&["kubeadm-config"]),
            resources: strings(&["configmaps"]),
            verbs: strings(&["get"]),
            non_resource_urls: None,
        };
        assert_eq!(format_rule(&rule), r#"get configmaps "kubeadm-config" ()"#);
    }

    #[test]
    fn test_empty_lists_contribute_nothing() {
        let rule = PolicyRule {
            verbs: strings(&["list"]),
            resources: Some(vec![]),
            resource_names: Some(vec![]),
            non_resource_urls: Some(vec![]),
            api_groups: Some(vec![]),
        };
        assert_eq!(format_rule(&rule), "list");
    }

    #[test]
    fn test_format_rules_terminates_each_line() {
        let rules = vec![
            PolicyRule {
                verbs: strings(&["get"]),
                resources: strings(&["pods"]),
                ..Default::default()
            },
            PolicyRule {
                verbs: strings(&["list"]),
                resources: strings(&["secrets"]),
                ..Default::default()
            },
        ];
        assert_eq!(format_rules(&rules), "get pods\nlist secrets\n");
        assert_eq!(format_rules(&Vec::<PolicyRule>::new()), "");
    }
}
