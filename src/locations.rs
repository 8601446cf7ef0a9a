//! Nigerian States and Local Government Areas
//!
//! Source of the state select and its dependent LGA select. The LGA lists are
//! abridged to the areas the hospital's catchment covers.

use leptos_forge::SelectOption;

const LOCATIONS: &[(&str, &[&str])] = &[
    ("Abia", &["Aba North", "Aba South", "Arochukwu", "Bende", "Umuahia North", "Umuahia South"]),
    ("Anambra", &["Aguata", "Awka North", "Awka South", "Idemili North", "Nnewi North", "Onitsha North", "Onitsha South"]),
    ("Enugu", &["Enugu East", "Enugu North", "Enugu South", "Nsukka", "Udi", "Oji River"]),
    ("Federal Capital Territory", &["Abaji", "Abuja Municipal", "Bwari", "Gwagwalada", "Kuje", "Kwali"]),
    ("Kaduna", &["Chikun", "Igabi", "Kaduna North", "Kaduna South", "Zaria"]),
    ("Kano", &["Dala", "Fagge", "Gwale", "Kano Municipal", "Nassarawa", "Tarauni", "Ungogo"]),
    ("Lagos", &["Alimosho", "Eti-Osa", "Ikeja", "Ikorodu", "Kosofe", "Lagos Island", "Lagos Mainland", "Surulere"]),
    ("Oyo", &["Ibadan North", "Ibadan North-East", "Ibadan South-West", "Ogbomosho North", "Oyo East"]),
    ("Rivers", &["Bonny", "Eleme", "Ikwerre", "Obio/Akpor", "Okrika", "Port Harcourt"]),
];

pub fn states() -> Vec<SelectOption> {
    LOCATIONS.iter().map(|(state, _)| SelectOption::from(*state)).collect()
}

/// LGAs of `state`; empty for an unknown or blank state
pub fn lgas_of(state: &str) -> Vec<SelectOption> {
    LOCATIONS
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, lgas)| lgas.iter().map(|lga| SelectOption::from(*lga)).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_has_lgas() {
        for state in states() {
            assert!(!lgas_of(&state.value).is_empty(), "{} has no LGAs", state.value);
        }
    }

    #[test]
    fn unknown_state_has_none() {
        assert!(lgas_of("").is_empty());
        assert!(lgas_of("Atlantis").is_empty());
        assert!(lgas_of("Lagos").iter().any(|o| o.value == "Ikeja"));
    }
}
