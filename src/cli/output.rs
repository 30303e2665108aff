//! Printing outcomes as text or the uniform JSON shape

use serde::Serialize;
use std::fmt::Write as _;
use std::process::ExitCode;

use crate::services::fallback::CompanyProfile;
use crate::services::{Catalog, CategoryServices, DashboardStats};
use crate::types::{Category, Contact, Outcome, Service};

/// Print an outcome and map it to an exit status.
///
/// Degraded data still renders (with a note on stderr); only `Failed` is a
/// non-zero exit.
pub fn emit<T: Serialize>(
    outcome: &Outcome<T>,
    json: bool,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        match outcome {
            Outcome::Live(data) => print!("{}", render(data)),
            Outcome::Degraded { data, reason } => {
                eprintln!("note: backend unavailable ({}); showing bundled data", reason);
                print!("{}", render(data));
            }
            Outcome::Failed { message, error } => {
                eprintln!("error: {}", message);
                if let Some(error) = error {
                    eprintln!("  caused by: {}", error);
                }
            }
        }
    }
    Ok(exit_code(outcome))
}

pub fn exit_code<T>(outcome: &Outcome<T>) -> ExitCode {
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Fixed confirmation line for writes whose payload is not worth showing
pub fn done(message: &str) -> impl FnOnce(&serde_json::Value) -> String + '_ {
    move |_| format!("{}\n", message)
}

pub fn company(profile: &CompanyProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} - {}", profile.name, profile.tagline);
    let _ = writeln!(out, "{}", profile.subtitle);
    let _ = writeln!(out, "{}", profile.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "Phone:   {}", profile.phone);
    let _ = writeln!(out, "Email:   {}", profile.email);
    let _ = writeln!(out, "Web:     {}", profile.domain);
    let _ = writeln!(out, "Address: {}", profile.address);
    out
}

pub fn categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories.\n".to_string();
    }
    let mut out = String::new();
    for cat in categories {
        let _ = write!(out, "{:<20} {:<20}", cat.name, cat.slug);
        if !cat.id.is_empty() {
            let _ = write!(out, " [{}]", cat.id);
        }
        let _ = writeln!(out, " {}", cat.status);
        if !cat.description.is_empty() {
            let _ = writeln!(out, "    {}", cat.description);
        }
    }
    out
}

pub fn services(services: &[Service]) -> String {
    if services.is_empty() {
        return "No services.\n".to_string();
    }
    let mut out = String::new();
    for svc in services {
        let _ = write!(out, "{:<28} {:>10}", svc.name, format_price(svc.price));
        if !svc.duration.is_empty() {
            let _ = write!(out, " / {}", svc.duration);
        }
        if !svc.id.is_empty() {
            let _ = write!(out, " [{}]", svc.id);
        }
        let _ = writeln!(out);
        if !svc.features.is_empty() {
            let _ = writeln!(out, "    {}", svc.features.join(", "));
        }
    }
    out
}

pub fn category_services(listing: &CategoryServices) -> String {
    format!(
        "{} ({})\n{}",
        listing.category.name,
        listing.category.slug,
        services(&listing.services)
    )
}

pub fn catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    for cat in &catalog.categories {
        let _ = writeln!(out, "== {} ==", cat.name);
        let listed = catalog
            .services
            .get(&cat.slug)
            .map(Vec::as_slice)
            .unwrap_or_default();
        out.push_str(&services(listed));
        let _ = writeln!(out);
    }
    out
}

pub fn contacts(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return "No contacts.\n".to_string();
    }
    let mut out = String::new();
    for contact in contacts {
        let received = contact
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:<15} {:<18} {} [{}]",
            contact.status, contact.name, contact.phone, contact.service_type, received, contact.id
        );
        if !contact.pickup_location.is_empty() || !contact.drop_location.is_empty() {
            let _ = writeln!(
                out,
                "    {} -> {}",
                contact.pickup_location, contact.drop_location
            );
        }
        if !contact.message.is_empty() {
            let _ = writeln!(out, "    \"{}\"", contact.message);
        }
    }
    out
}

pub fn dashboard(stats: &DashboardStats) -> String {
    format!(
        "Categories:       {}\nServices:         {}\nContacts:         {}\nPending contacts: {}\n",
        stats.categories, stats.services, stats.contacts, stats.pending_contacts
    )
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("Rs {:.0}", price)
    } else {
        format!("Rs {:.2}", price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fallback;
    use serde_json::json;

    fn same(a: ExitCode, b: ExitCode) -> bool {
        format!("{:?}", a) == format!("{:?}", b)
    }

    #[test]
    fn test_exit_code_only_fails_on_failed() {
        assert!(same(exit_code(&Outcome::Live(1)), ExitCode::SUCCESS));
        let degraded = Outcome::Degraded {
            data: 1,
            reason: "down".into(),
        };
        assert!(same(exit_code(&degraded), ExitCode::SUCCESS));
        assert!(same(exit_code(&Outcome::<u8>::failed("x")), ExitCode::FAILURE));
    }

    #[test]
    fn test_company_text() {
        let text = company(&fallback::COMPANY);
        assert!(text.starts_with("Go Cab - "));
        assert!(text.contains("+919102749920"));
    }

    #[test]
    fn test_services_text_lists_features() {
        let text = services(&fallback::services_for("outstation"));
        assert!(text.contains("Outstation Economy"));
        assert!(text.contains("Rs 12 / Per KM"));
        assert!(text.contains("Fuel Included, Driver Allowance"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(categories(&[]), "No categories.\n");
        assert_eq!(services(&[]), "No services.\n");
        assert_eq!(contacts(&[]), "No contacts.\n");
    }

    #[test]
    fn test_catalog_text_groups_by_category() {
        let catalog = Catalog {
            categories: fallback::categories(),
            services: fallback::services_by_slug(),
        };
        let text = super::catalog(&catalog);
        let airport = text.find("== Airport Transfer ==").unwrap();
        let vip = text.find("Airport VIP Transfer").unwrap();
        assert!(airport < vip);
    }

    #[test]
    fn test_contacts_text() {
        let list: Vec<Contact> = serde_json::from_value(json!([{
            "_id": "k1",
            "name": "Asha",
            "phone": "98765",
            "serviceType": "outstation",
            "pickupLocation": "Ranchi",
            "dropLocation": "Jamshedpur",
            "createdAt": "2024-03-01T10:30:00Z"
        }]))
        .unwrap();
        let text = contacts(&list);
        assert!(text.starts_with("unread"));
        assert!(text.contains("2024-03-01 10:30"));
        assert!(text.contains("Ranchi -> Jamshedpur"));
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_price(450.0), "Rs 450");
        assert_eq!(format_price(12.5), "Rs 12.50");
    }
}
