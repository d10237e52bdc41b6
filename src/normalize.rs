use crate::model::Keyframe;
use crate::store::KeyframeField;

/// Repairs the field's key sequence so that key 0 sits at time 0 and times
/// increase strictly, then returns the corrected sequence.
///
/// The pass snapshots the store, computes the corrected sequence locally and
/// applies the difference as descending-index removals followed by at most
/// one insert. The returned buffer matches the store contents afterwards, so
/// callers do not need to refetch. Running the pass twice changes nothing.
pub fn normalize_keys(field: &mut dyn KeyframeField) -> Vec<Keyframe> {
    let count = field.key_count();
    if count == 0 {
        return Vec::new();
    }

    let snapshot: Vec<Keyframe> = (0..count).map(|i| field.key(i)).collect();
    let replace_first = snapshot[0].time != 0.0;

    let mut corrected = Vec::with_capacity(count);
    corrected.push(Keyframe::new(0.0, snapshot[0].value));

    let mut removed = Vec::new();
    if replace_first {
        removed.push(0);
    }

    // Keys that fail to advance past the last accepted time are dropped; the
    // cursor stays put so a run of bad keys all compare against the same
    // baseline.
    let mut last = 0.0f32;
    for (i, key) in snapshot.iter().enumerate().skip(1) {
        if key.time <= last {
            removed.push(i);
            continue;
        }
        last = key.time;
        corrected.push(*key);
    }

    for &index in removed.iter().rev() {
        field.remove_key(index);
    }
    if replace_first {
        field.add_key(0.0, snapshot[0].value);
    }

    if replace_first || !removed.is_empty() {
        tracing::debug!(
            removed = removed.len(),
            rehomed_first = replace_first,
            "repaired keyframe sequence"
        );
    }

    corrected
}
