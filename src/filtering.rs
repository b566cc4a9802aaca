use crate::config::CriticalObjectFilterConfig;
use crate::object::DynamicObject;

/// Tells whether a single object is critical under the filter config.
///
/// An object is critical iff its label is among the configured target labels
/// (an empty target set keeps every label) and it carries none of the
/// configured `key=value` ignore attributes.
pub fn is_critical(object: &DynamicObject, config: &CriticalObjectFilterConfig) -> bool {
    config.is_target(object.label())
        && !config
            .ignore_attributes()
            .iter()
            .any(|(key, value)| object.has_attribute(key, value))
}

/// Selects the critical subset of a frame's objects, preserving input order.
///
/// Only ground truth objects go through this filter; estimated objects are
/// matched unfiltered and their labels are consulted later, when deciding
/// which FPs count towards pass/fail.
pub fn filter_critical(
    objects: &[DynamicObject],
    config: &CriticalObjectFilterConfig,
) -> Vec<DynamicObject> {
    objects
        .iter()
        .filter(|obj| is_critical(obj, config))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::config::CriticalObjectFilterConfig;
    use crate::filtering::filter_critical;
    use crate::object::DynamicObject;
    use crate::utils::bbox::BoundingBox;

    fn obj(label: &str) -> DynamicObject {
        DynamicObject::new(label, BoundingBox::new(0.0, 0.0, 10.0, 10.0), 1.0)
    }

    #[test]
    fn label_filtering_preserves_order() {
        let objects = vec![obj("car"), obj("tree"), obj("pedestrian"), obj("car")];
        let config = CriticalObjectFilterConfig::new(&["car", "pedestrian"], &[]).unwrap();

        let critical = filter_critical(&objects, &config);
        let labels: Vec<_> = critical.iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["car", "pedestrian", "car"]);
    }

    #[test]
    fn empty_target_labels_pass_everything() {
        let objects = vec![obj("car"), obj("tree")];
        let config = CriticalObjectFilterConfig::new(&[], &[]).unwrap();
        assert_eq!(filter_critical(&objects, &config).len(), 2);
    }

    #[test]
    fn ignore_attributes_exclude_exact_matches() {
        let riderless = obj("bicycle").with_attribute("cycle_state", "without_rider");
        let ridden = obj("bicycle").with_attribute("cycle_state", "with_rider");
        let objects = vec![riderless, ridden];

        let config =
            CriticalObjectFilterConfig::new(&["bicycle"], &["cycle_state=without_rider"]).unwrap();
        let critical = filter_critical(&objects, &config);

        assert_eq!(critical.len(), 1);
        assert!(critical[0].has_attribute("cycle_state", "with_rider"));
    }
}
