use std::collections::BTreeMap;

use crate::config::AccessRestriction;

/// Notices to show for a shoot, given its seed selector labels and annotations.
pub fn restriction_messages(
    restrictions: &[AccessRestriction],
    match_labels: &BTreeMap<String, String>,
    annotations: &BTreeMap<String, String>,
) -> Vec<String> {
    let is_true = |map: &BTreeMap<String, String>, key: &str| {
        map.get(key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    };

    let mut messages = Vec::new();
    for restriction in restrictions {
        if !restriction.notify_if || !is_true(match_labels, &restriction.key) {
            continue;
        }
        messages.push(restriction.msg.clone());
        for option in &restriction.options {
            if is_true(annotations, &option.key) == option.notify_if {
                messages.push(option.msg.clone());
            }
        }
    }
    messages.retain(|m| !m.is_empty());
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessRestrictionOption;

    fn restriction() -> AccessRestriction {
        AccessRestriction {
            key: "seed.gardener.cloud/eu-access".into(),
            notify_if: true,
            msg: "EU access only".into(),
            options: vec![AccessRestrictionOption {
                key: "support.gardener.cloud/eu-access-for-cluster-addons".into(),
                notify_if: false,
                msg: "no personal data in addons".into(),
            }],
        }
    }

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unrestricted_shoot_has_no_messages() {
        let msgs = restriction_messages(&[restriction()], &BTreeMap::new(), &BTreeMap::new());
        assert!(msgs.is_empty());
    }

    #[test]
    fn restricted_shoot_reports_restriction_and_unset_option() {
        let labels = map(&[("seed.gardener.cloud/eu-access", "true")]);
        let msgs = restriction_messages(&[restriction()], &labels, &BTreeMap::new());
        assert_eq!(msgs, vec!["EU access only", "no personal data in addons"]);
    }

    #[test]
    fn option_annotation_suppresses_option_message() {
        let labels = map(&[("seed.gardener.cloud/eu-access", "true")]);
        let annotations = map(&[("support.gardener.cloud/eu-access-for-cluster-addons", "true")]);
        let msgs = restriction_messages(&[restriction()], &labels, &annotations);
        assert_eq!(msgs, vec!["EU access only"]);
    }
}
