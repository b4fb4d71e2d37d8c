//! Tabular exports of the persons list.
//!
//! Both formats carry the same eight columns in the same order. CSV uses the
//! field keys as headers; the spreadsheet uses the display titles.

use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook};

use super::error::{ServiceError, ServiceResult};
use crate::api::{PersonField, PersonResponse};

/// Date rendering used in both exports (`21-07-1985`).
pub const EXPORT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Worksheet name of the spreadsheet export.
pub const EXPORT_SHEET_NAME: &str = "Page 1";

fn export_date(person: &PersonResponse) -> String {
    person
        .date_of_birth
        .map(|d| d.format(EXPORT_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Render persons as CSV with a header row.
pub fn persons_to_csv(persons: &[PersonResponse]) -> ServiceResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(PersonField::ALL.iter().map(|f| f.key()))?;

    for person in persons {
        writer.write_record([
            person.person_name.clone().unwrap_or_default(),
            person.email.clone().unwrap_or_default(),
            export_date(person),
            person.age.map(|a| a.to_string()).unwrap_or_default(),
            person.gender.clone().unwrap_or_default(),
            person.country.clone().unwrap_or_default(),
            person.address.clone().unwrap_or_default(),
            person.receive_news_letters.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ServiceError::Export(e.to_string()))
}

/// Render persons as an `.xlsx` workbook with a single `"Page 1"` sheet.
pub fn persons_to_xlsx(persons: &[PersonResponse]) -> ServiceResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new()
        .set_bold()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(0xD3D3D3));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, field) in PersonField::ALL.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, field.title(), &header)?;
    }

    for (idx, person) in persons.iter().enumerate() {
        let row = idx as u32 + 1;
        if let Some(name) = &person.person_name {
            worksheet.write_string(row, 0, name)?;
        }
        if let Some(email) = &person.email {
            worksheet.write_string(row, 1, email)?;
        }
        if person.date_of_birth.is_some() {
            worksheet.write_string(row, 2, export_date(person))?;
        }
        if let Some(age) = person.age {
            worksheet.write_number(row, 3, age as f64)?;
        }
        if let Some(gender) = &person.gender {
            worksheet.write_string(row, 4, gender)?;
        }
        if let Some(country) = &person.country {
            worksheet.write_string(row, 5, country)?;
        }
        if let Some(address) = &person.address {
            worksheet.write_string(row, 6, address)?;
        }
        worksheet.write_boolean(row, 7, person.receive_news_letters)?;
    }

    worksheet.autofit();
    Ok(workbook.save_to_buffer()?)
}
