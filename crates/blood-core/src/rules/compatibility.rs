//! ABO/Rh compatibility table
//!
//! The forward relation (who a group can give to) is the source of truth.
//! The inverse relation (who can give to a group) is derived from it once and
//! cached for the life of the process.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::value_objects::BloodGroup;

use BloodGroup::{
    AbNegative as AB_NEG, AbPositive as AB_POS, ANegative as A_NEG, APositive as A_POS,
    BNegative as B_NEG, BPositive as B_POS, ONegative as O_NEG, OPositive as O_POS,
};

/// Forward map: donor group -> recipient groups
const CAN_DONATE_TO: [(BloodGroup, &[BloodGroup]); 8] = [
    (O_NEG, &[O_NEG, O_POS, A_NEG, A_POS, B_NEG, B_POS, AB_NEG, AB_POS]),
    (O_POS, &[O_POS, A_POS, B_POS, AB_POS]),
    (A_NEG, &[A_NEG, A_POS, AB_NEG, AB_POS]),
    (A_POS, &[A_POS, AB_POS]),
    (B_NEG, &[B_NEG, B_POS, AB_NEG, AB_POS]),
    (B_POS, &[B_POS, AB_POS]),
    (AB_NEG, &[AB_NEG, AB_POS]),
    (AB_POS, &[AB_POS]),
];

static RECEIVES_FROM: LazyLock<HashMap<BloodGroup, Vec<BloodGroup>>> = LazyLock::new(|| {
    BloodGroup::ALL
        .into_iter()
        .map(|recipient| {
            let donors = CAN_DONATE_TO
                .iter()
                .filter(|(_, targets)| targets.contains(&recipient))
                .map(|(donor, _)| *donor)
                .collect();
            (recipient, donors)
        })
        .collect()
});

/// Recipient groups a donor of `group` may give to
pub fn can_donate_to(group: BloodGroup) -> &'static [BloodGroup] {
    CAN_DONATE_TO
        .iter()
        .find(|(donor, _)| *donor == group)
        .map_or(&[], |(_, targets)| targets)
}

/// Donor groups that may legally give to a patient needing `required`
pub fn compatible_donors(required: BloodGroup) -> &'static [BloodGroup] {
    RECEIVES_FROM.get(&required).map_or(&[], Vec::as_slice)
}

/// Same as [`compatible_donors`] for a raw string; unknown groups yield an empty set
pub fn compatible_donors_for(required: &str) -> &'static [BloodGroup] {
    BloodGroup::parse(required).map_or(&[], compatible_donors)
}

/// Whether a donor of `donor` can give to a recipient of `recipient`
#[inline]
pub fn is_compatible(donor: BloodGroup, recipient: BloodGroup) -> bool {
    can_donate_to(donor).contains(&recipient)
}
