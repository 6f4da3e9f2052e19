use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const RECORD_FIELDS: [&str; 6] = [
    "Car_Name",
    "Year",
    "Kilometers_Driven",
    "Fuel_Type",
    "Transmission",
    "Price",
];

const FUEL_TYPES: [&str; 5] = ["petrol", "diesel", "cng", "electric", "hybrid"];
const TRANSMISSIONS: [&str; 3] = ["manual", "auto", "automatic"];
const CURRENCY_GLYPH: char = '₹';

static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)[0-9]{2}\b").expect("valid year regex"));
static PRICE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"₹[0-9.]+\s*lakh").expect("valid price regex"));

/// One listing item, flattened into the six output columns.
///
/// Every column is always present; a value that could not be found in the
/// item's text is left as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "Car_Name")]
    pub car_name: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Kilometers_Driven")]
    pub kilometers_driven: String,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: String,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    #[serde(rename = "Price")]
    pub price: String,
}

impl Record {
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            (RECORD_FIELDS[0], &self.car_name),
            (RECORD_FIELDS[1], &self.year),
            (RECORD_FIELDS[2], &self.kilometers_driven),
            (RECORD_FIELDS[3], &self.fuel_type),
            (RECORD_FIELDS[4], &self.transmission),
            (RECORD_FIELDS[5], &self.price),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_empty())
    }

    fn is_filled(&self, field: LineField) -> bool {
        !self.slot(field).is_empty()
    }

    fn slot(&self, field: LineField) -> &String {
        match field {
            LineField::KilometersDriven => &self.kilometers_driven,
            LineField::FuelType => &self.fuel_type,
            LineField::Transmission => &self.transmission,
            LineField::Price => &self.price,
        }
    }

    fn slot_mut(&mut self, field: LineField) -> &mut String {
        match field {
            LineField::KilometersDriven => &mut self.kilometers_driven,
            LineField::FuelType => &mut self.fuel_type,
            LineField::Transmission => &mut self.transmission,
            LineField::Price => &mut self.price,
        }
    }
}

/// Columns that can be filled from the lines after the title line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineField {
    KilometersDriven,
    FuelType,
    Transmission,
    Price,
}

type LinePredicate = fn(&str) -> bool;

// Checked top to bottom; predicates receive the lowercased line.
const LINE_RULES: [(LinePredicate, LineField); 4] = [
    (is_kilometers_line, LineField::KilometersDriven),
    (is_fuel_line, LineField::FuelType),
    (is_transmission_line, LineField::Transmission),
    (is_price_line, LineField::Price),
];

fn is_kilometers_line(line: &str) -> bool {
    line.contains("km") && (line.contains('k') || line.chars().any(|c| c.is_ascii_digit()))
}

fn is_fuel_line(line: &str) -> bool {
    FUEL_TYPES.iter().any(|fuel| line.contains(fuel))
}

fn is_transmission_line(line: &str) -> bool {
    TRANSMISSIONS.iter().any(|trans| line.contains(trans))
}

fn is_price_line(line: &str) -> bool {
    line.contains("lakh") && line.contains(CURRENCY_GLYPH)
}

pub fn extract_year(title: &str) -> Option<&str> {
    YEAR_REGEX.find(title).map(|m| m.as_str())
}

pub fn extract_price(line: &str) -> Option<&str> {
    PRICE_REGEX.find(line).map(|m| m.as_str())
}

/// Parses the visible text of one listing item into a [`Record`].
///
/// The first line carries the title and year. Every later line is matched
/// against the km, fuel, transmission and price rules in that order and fills
/// the first matching column that is still empty. Lines that match nothing are
/// skipped.
pub fn extract_record(text: &str) -> Record {
    let mut record = Record::default();

    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    let Some(title) = lines.next() else {
        return record;
    };

    if let Some(year) = extract_year(title) {
        record.year = year.to_string();
        record.car_name = title.to_string();
    }

    for line in lines {
        let lowered = line.to_lowercase();

        let field = LINE_RULES
            .iter()
            .find(|(matches, field)| !record.is_filled(*field) && matches(&lowered))
            .map(|(_, field)| *field);

        match field {
            Some(LineField::Price) => match extract_price(line) {
                Some(price) => record.price = price.to_string(),
                None => log::debug!("Price keywords without a price amount: {}", line),
            },
            Some(field) => *record.slot_mut(field) = line.to_string(),
            None => {}
        }
    }

    record
}
