use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::config::DataVariant;
use crate::generator::Record;

/// Internal identifier of a generated value, independent of the caption it
/// appears under on a page. Serializes to its camelCase wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    BirthDate,
    Gender,
    FirstName,
    MiddleName,
    LastName,
    Email,
    Addr1,
    Addr2,
    SecAddr1,
    SecAddr2,
    City,
    SecCity,
    State,
    SecState,
    Zip,
    SecZip,
    Ssn,
    Acct,
    Routing,
    PrimaryPhone,
    AlternatePhone,
    Arbor,
    GrossAnnualIncome,
    NetWorth,
    Amount,
    TaxId,
    Percentage,
    CopyAddress,
    HomePhone,
    TrustName,
    TaxIdNumber,
    DateEstablished,
    TrusteeName,
    TelephoneNumber,
    CorporationName,
    OfficerName,
    Position,
    GenericName,
    DriversLicence,
    CertificateNumber,
    CurrentDate,
    ParentGuardian,
    GreenCard,
    #[serde(rename = "premiumAmountDCA")]
    PremiumAmountDca,
}

impl FieldKey {
    pub const ALL: &'static [FieldKey] = &[
        FieldKey::BirthDate,
        FieldKey::Gender,
        FieldKey::FirstName,
        FieldKey::MiddleName,
        FieldKey::LastName,
        FieldKey::Email,
        FieldKey::Addr1,
        FieldKey::Addr2,
        FieldKey::SecAddr1,
        FieldKey::SecAddr2,
        FieldKey::City,
        FieldKey::SecCity,
        FieldKey::State,
        FieldKey::SecState,
        FieldKey::Zip,
        FieldKey::SecZip,
        FieldKey::Ssn,
        FieldKey::Acct,
        FieldKey::Routing,
        FieldKey::PrimaryPhone,
        FieldKey::AlternatePhone,
        FieldKey::Arbor,
        FieldKey::GrossAnnualIncome,
        FieldKey::NetWorth,
        FieldKey::Amount,
        FieldKey::TaxId,
        FieldKey::Percentage,
        FieldKey::CopyAddress,
        FieldKey::HomePhone,
        FieldKey::TrustName,
        FieldKey::TaxIdNumber,
        FieldKey::DateEstablished,
        FieldKey::TrusteeName,
        FieldKey::TelephoneNumber,
        FieldKey::CorporationName,
        FieldKey::OfficerName,
        FieldKey::Position,
        FieldKey::GenericName,
        FieldKey::DriversLicence,
        FieldKey::CertificateNumber,
        FieldKey::CurrentDate,
        FieldKey::ParentGuardian,
        FieldKey::GreenCard,
        FieldKey::PremiumAmountDca,
    ];
}

/// Labels shared by both variants, in fill order.
const COMMON_LABELS: &[(&str, FieldKey)] = &[
    ("Birth Date", FieldKey::BirthDate),
    ("Date of Birth", FieldKey::BirthDate),
    ("Gender", FieldKey::Gender),
    ("First Name", FieldKey::FirstName),
    ("Middle Name", FieldKey::MiddleName),
    ("Last Name", FieldKey::LastName),
    ("Email", FieldKey::Email),
    ("Primary Address Line 1", FieldKey::Addr1),
    ("Primary Address Line 2", FieldKey::Addr2),
    ("Address Line 1", FieldKey::Addr1),
    ("Address Line1", FieldKey::Addr1),
    ("Address Line 2", FieldKey::Addr2),
    ("Address Line2", FieldKey::Addr2),
    ("City", FieldKey::City),
    ("State", FieldKey::State),
    ("Zip Code", FieldKey::Zip),
    ("Social Security Number", FieldKey::Ssn),
    ("SSN/Tax ID", FieldKey::TaxId),
    ("SSN", FieldKey::TaxId),
    ("Account No.", FieldKey::Acct),
    ("Routing No.", FieldKey::Routing),
    ("Primary Phone", FieldKey::PrimaryPhone),
    ("Phone", FieldKey::PrimaryPhone),
    ("Alternate Phone", FieldKey::AlternatePhone),
    ("Arbor", FieldKey::Arbor),
    ("Gross Annual Income", FieldKey::GrossAnnualIncome),
    ("Net worth", FieldKey::NetWorth),
    ("Percentage", FieldKey::Percentage),
];

const DEFAULT_ONLY_LABELS: &[(&str, FieldKey)] = &[("Copy Address", FieldKey::CopyAddress)];

const TRAILING_LABELS: &[(&str, FieldKey)] = &[
    ("Home Phone", FieldKey::HomePhone),
    ("Trust Name", FieldKey::TrustName),
    ("Tax ID Number", FieldKey::TaxIdNumber),
    ("Date Established", FieldKey::DateEstablished),
    ("Trustee Name", FieldKey::TrusteeName),
    ("Telephone Number", FieldKey::TelephoneNumber),
    ("Corporation Name", FieldKey::CorporationName),
    ("Officer Name", FieldKey::OfficerName),
    ("Position", FieldKey::Position),
    ("Name", FieldKey::GenericName),
    ("Driver's License Number", FieldKey::DriversLicence),
    ("Certificate #", FieldKey::CertificateNumber),
    ("Routing Number", FieldKey::Routing),
    ("Amount with Application", FieldKey::Amount),
    ("Requested Effective Date", FieldKey::CurrentDate),
    ("Parent/Guardian for Juvenile Insured", FieldKey::ParentGuardian),
    ("Green Card #", FieldKey::GreenCard),
    ("Premium Amount for DCA", FieldKey::PremiumAmountDca),
    ("Date Premium Expected to be Received", FieldKey::CurrentDate),
];

const HARDCODED_ONLY_LABELS: &[(&str, FieldKey)] = &[
    ("Secondary Address Line 1", FieldKey::SecAddr1),
    ("Secondary Address Line 2", FieldKey::SecAddr2),
    ("Secondary City", FieldKey::SecCity),
    ("Secondary State", FieldKey::SecState),
    ("Secondary Zip Code", FieldKey::SecZip),
];

/// Choices for labels rendered as a constrained dropdown.
const DROPDOWN_VALUES: &[(&str, &[&str])] = &[
    ("Gender", &["Male", "Female"]),
    ("State", &["California", "Texas", "Florida", "New York", "Illinois"]),
    ("Suffix", &["II", "III", "IV", "V", "Jr", "Sr"]),
];

/// Ordered `(label, key)` pairs for a variant.
pub fn label_map(variant: DataVariant) -> Vec<(&'static str, FieldKey)> {
    let extra: &[(&str, FieldKey)] = match variant {
        DataVariant::Default => DEFAULT_ONLY_LABELS,
        DataVariant::Hardcoded => &[],
    };
    let secondary: &[(&str, FieldKey)] = match variant {
        DataVariant::Default => &[],
        DataVariant::Hardcoded => HARDCODED_ONLY_LABELS,
    };
    COMMON_LABELS
        .iter()
        .chain(extra)
        .chain(TRAILING_LABELS)
        .chain(secondary)
        .copied()
        .collect()
}

/// Allowed choices for a dropdown label, if it has any.
pub fn dropdown_choices(label: &str) -> Option<&'static [&'static str]> {
    DROPDOWN_VALUES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, choices)| *choices)
}

/// How a step is committed to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Label/span lookup, then dispatch on the element shape.
    Resolve,
    /// Type into the custom dropdown widget and pick the rendered option.
    Dropdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillStep {
    pub label: &'static str,
    pub value: String,
    pub mode: FillMode,
}

/// Turn a record into the ordered list of steps a fill pass performs.
pub fn fill_plan<R: Rng + ?Sized>(
    record: &Record,
    variant: DataVariant,
    rng: &mut R,
) -> Vec<FillStep> {
    label_map(variant)
        .into_iter()
        .filter_map(|(label, key)| {
            let value = record.get(key).unwrap_or_default();
            match variant {
                DataVariant::Default => Some(FillStep {
                    label,
                    value: value.to_string(),
                    mode: FillMode::Resolve,
                }),
                DataVariant::Hardcoded => match dropdown_choices(label) {
                    Some(choices) => {
                        let value = if value.is_empty() {
                            choices.choose(rng)?.to_string()
                        } else {
                            value.to_string()
                        };
                        Some(FillStep {
                            label,
                            value,
                            mode: FillMode::Dropdown,
                        })
                    }
                    None if value.is_empty() => None,
                    None => Some(FillStep {
                        label,
                        value: value.to_string(),
                        mode: FillMode::Resolve,
                    }),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key_for(variant: DataVariant, label: &str) -> Option<FieldKey> {
        label_map(variant)
            .into_iter()
            .find(|(l, _)| *l == label)
            .map(|(_, key)| key)
    }

    #[test]
    fn ssn_labels_share_tax_id() {
        assert_eq!(key_for(DataVariant::Default, "SSN"), Some(FieldKey::TaxId));
        assert_eq!(key_for(DataVariant::Default, "SSN/Tax ID"), Some(FieldKey::TaxId));
        assert_eq!(
            key_for(DataVariant::Default, "Social Security Number"),
            Some(FieldKey::Ssn)
        );
    }

    #[test]
    fn variants_differ_in_labels() {
        assert_eq!(
            key_for(DataVariant::Default, "Copy Address"),
            Some(FieldKey::CopyAddress)
        );
        assert_eq!(key_for(DataVariant::Hardcoded, "Copy Address"), None);
        assert_eq!(key_for(DataVariant::Default, "Secondary City"), None);
        assert_eq!(
            key_for(DataVariant::Hardcoded, "Secondary City"),
            Some(FieldKey::SecCity)
        );
    }

    #[test]
    fn labels_are_unique_per_variant() {
        for variant in [DataVariant::Default, DataVariant::Hardcoded] {
            let map = label_map(variant);
            let mut labels: Vec<_> = map.iter().map(|(l, _)| *l).collect();
            labels.sort_unstable();
            labels.dedup();
            assert_eq!(labels.len(), map.len(), "{variant:?}");
        }
    }

    #[test]
    fn wire_names_are_unique() {
        let mut names: Vec<_> = FieldKey::ALL
            .iter()
            .map(|k| serde_json::to_value(k).unwrap().as_str().unwrap().to_string())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FieldKey::ALL.len());
        assert_eq!(serde_json::to_value(FieldKey::PremiumAmountDca).unwrap(), "premiumAmountDCA");
        assert_eq!(serde_json::to_value(FieldKey::SecAddr1).unwrap(), "secAddr1");
        assert_eq!(serde_json::to_value(FieldKey::DriversLicence).unwrap(), "driversLicence");
    }

    #[test]
    fn dropdown_table_lookup() {
        assert_eq!(dropdown_choices("Gender"), Some(&["Male", "Female"][..]));
        assert!(dropdown_choices("State").unwrap().contains(&"Texas"));
        assert!(dropdown_choices("City").is_none());
    }

    #[test]
    fn default_plan_writes_missing_values_as_empty() {
        let mut record = Record::default();
        record.insert(FieldKey::FirstName, Some("Ada".into()));
        let mut rng = StdRng::seed_from_u64(1);
        let plan = fill_plan(&record, DataVariant::Default, &mut rng);

        assert_eq!(plan.len(), label_map(DataVariant::Default).len());
        assert!(plan.iter().all(|step| step.mode == FillMode::Resolve));
        let first = plan.iter().find(|s| s.label == "First Name").unwrap();
        assert_eq!(first.value, "Ada");
        let last = plan.iter().find(|s| s.label == "Last Name").unwrap();
        assert_eq!(last.value, "");
    }

    #[test]
    fn hardcoded_plan_skips_empty_and_uses_dropdown_choices() {
        let mut record = Record::default();
        record.insert(FieldKey::FirstName, Some("Ada".into()));
        record.insert(FieldKey::State, Some("Texas".into()));
        let mut rng = StdRng::seed_from_u64(1);
        let plan = fill_plan(&record, DataVariant::Hardcoded, &mut rng);

        let labels: Vec<_> = plan.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Gender", "First Name", "State"]);

        let gender = &plan[0];
        assert_eq!(gender.mode, FillMode::Dropdown);
        assert!(["Male", "Female"].contains(&gender.value.as_str()));

        assert_eq!(plan[1].mode, FillMode::Resolve);
        assert_eq!(plan[2].value, "Texas");
        assert_eq!(plan[2].mode, FillMode::Dropdown);
    }
}
