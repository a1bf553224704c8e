use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::config::DataVariant;
use crate::fields::FieldKey;
use crate::reference::ReferenceData;

const GENDERS: &[&str] = &["Male", "Female"];
const POSITIONS: &[&str] = &["CEO", "Manager", "Treasurer", "Secretary"];

/// One generation's worth of values, keyed by semantic field.
///
/// `None` marks a value whose reference list was empty or missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<FieldKey, Option<String>>);

impl Record {
    pub fn insert(&mut self, key: FieldKey, value: Option<String>) {
        self.0.insert(key, value);
    }

    /// The value for `key`, if it was generated.
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.0.get(&key).and_then(|value| value.as_deref())
    }

    pub fn contains_key(&self, key: FieldKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMode {
    /// Year in 1970..=2000, day capped at 28.
    Random,
    /// The supplied current date.
    Today,
}

/// `MM/DD/YYYY`, zero-padded.
pub fn format_date(month: u32, day: u32, year: i32) -> String {
    format!("{month:02}/{day:02}/{year}")
}

pub fn birth_date<R: Rng + ?Sized>(mode: DateMode, today: NaiveDate, rng: &mut R) -> String {
    match mode {
        DateMode::Today => format_date(today.month(), today.day(), today.year()),
        DateMode::Random => {
            let year = rng.gen_range(1970..=2000);
            let month = rng.gen_range(1..=12);
            let day = rng.gen_range(1..=28);
            format_date(month, day, year)
        }
    }
}

pub fn ssn<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}-{}-{}",
        rng.gen_range(100..=999),
        rng.gen_range(10..=99),
        rng.gen_range(1000..=9999)
    )
}

pub fn phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "({}) {}-{}",
        rng.gen_range(100..=999),
        rng.gen_range(100..=999),
        rng.gen_range(1000..=9999)
    )
}

pub fn zip<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(10000..=99999).to_string()
}

pub fn amount<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:.2}", f64::from(rng.gen_range(1000u32..=10000)))
}

fn account_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(10_000_000..=99_999_999).to_string()
}

fn pick<R: Rng + ?Sized>(list: &[String], rng: &mut R) -> Option<String> {
    list.choose(rng).cloned()
}

fn pick_static<R: Rng + ?Sized>(list: &[&str], rng: &mut R) -> String {
    list.choose(rng).copied().unwrap_or_default().to_string()
}

fn street_line<R: Rng + ?Sized>(reference: &ReferenceData, rng: &mut R) -> Option<String> {
    let number = rng.gen_range(100..=999);
    pick(&reference.streets, rng).map(|street| format!("{number} {street}"))
}

fn apartment<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("Apt {}", rng.gen_range(1..=99))
}

/// `"<first> <last>"` from a fresh, independent draw.
fn full_name<R: Rng + ?Sized>(reference: &ReferenceData, rng: &mut R) -> Option<String> {
    let first = pick(&reference.first_names, rng);
    let last = pick(&reference.last_names, rng);
    Some(format!("{} {}", first?, last?))
}

fn email(variant: DataVariant, first: &str, last: &str) -> String {
    let (first, last) = (first.to_lowercase(), last.to_lowercase());
    match variant {
        DataVariant::Default => format!("{first}.{last}@example.com"),
        DataVariant::Hardcoded => format!("{first}@{last}.com"),
    }
}

/// Produce a fresh record with an entry for every [`FieldKey`].
///
/// `firstName`, `lastName`, `email` and `parentGuardian` share one
/// first/last draw; every other name-like field draws on its own.
pub fn generate<R: Rng + ?Sized>(
    reference: &ReferenceData,
    variant: DataVariant,
    today: NaiveDate,
    rng: &mut R,
) -> Record {
    let first = pick(&reference.first_names, rng);
    let middle = pick(&reference.middle_names, rng);
    let last = pick(&reference.last_names, rng);
    let pair = first.as_deref().zip(last.as_deref());

    let mut record = Record::default();
    let mut set = |key: FieldKey, value: Option<String>| record.insert(key, value);

    set(FieldKey::BirthDate, Some(birth_date(DateMode::Random, today, rng)));
    set(FieldKey::Gender, Some(pick_static(GENDERS, rng)));
    set(FieldKey::FirstName, first.clone());
    set(FieldKey::MiddleName, middle);
    set(FieldKey::LastName, last.clone());
    set(FieldKey::Email, pair.map(|(f, l)| email(variant, f, l)));
    set(FieldKey::Addr1, street_line(reference, rng));
    set(FieldKey::Addr2, Some(apartment(rng)));
    set(FieldKey::SecAddr1, street_line(reference, rng));
    set(FieldKey::SecAddr2, Some(apartment(rng)));
    set(FieldKey::City, pick(&reference.cities, rng));
    set(FieldKey::SecCity, pick(&reference.cities, rng));
    set(FieldKey::State, pick(&reference.states, rng));
    set(FieldKey::SecState, pick(&reference.states, rng));
    set(FieldKey::Zip, Some(zip(rng)));
    set(FieldKey::SecZip, Some(zip(rng)));
    set(FieldKey::Ssn, Some(ssn(rng)));
    set(FieldKey::Acct, Some(account_number(rng)));
    set(FieldKey::Routing, pick(&reference.routing_numbers, rng));
    set(FieldKey::PrimaryPhone, Some(phone(rng)));
    set(FieldKey::AlternatePhone, Some(phone(rng)));
    set(FieldKey::Arbor, Some("Arbor Test".into()));
    set(FieldKey::GrossAnnualIncome, Some(amount(rng)));
    set(FieldKey::NetWorth, Some(amount(rng)));
    set(FieldKey::Amount, Some(amount(rng)));
    set(FieldKey::TaxId, Some(ssn(rng)));
    set(FieldKey::Percentage, Some("100%".into()));
    set(FieldKey::CopyAddress, Some("Yes".into()));
    set(FieldKey::HomePhone, Some(phone(rng)));
    set(FieldKey::TrustName, Some("Family Trust".into()));
    set(FieldKey::TaxIdNumber, Some(ssn(rng)));
    set(
        FieldKey::DateEstablished,
        Some(format_date(
            rng.gen_range(1..=12),
            rng.gen_range(1..=28),
            rng.gen_range(1990..=2020),
        )),
    );
    set(FieldKey::TrusteeName, full_name(reference, rng));
    set(FieldKey::TelephoneNumber, Some(phone(rng)));
    set(
        FieldKey::CorporationName,
        pick(&reference.last_names, rng).map(|name| format!("{name} Corp")),
    );
    set(FieldKey::OfficerName, full_name(reference, rng));
    set(FieldKey::Position, Some(pick_static(POSITIONS, rng)));
    set(FieldKey::GenericName, full_name(reference, rng));
    set(FieldKey::DriversLicence, pick(&reference.drivers_license_numbers, rng));
    set(FieldKey::CertificateNumber, pick(&reference.certificate_numbers, rng));
    set(FieldKey::CurrentDate, Some(birth_date(DateMode::Today, today, rng)));
    set(FieldKey::ParentGuardian, pair.map(|(f, l)| format!("{f} {l} Parent")));
    set(
        FieldKey::GreenCard,
        Some(format!("GreenCard{}", account_number(rng))),
    );
    set(
        FieldKey::PremiumAmountDca,
        Some(rng.gen_range(100_000..=999_999).to_string()),
    );

    record
}
