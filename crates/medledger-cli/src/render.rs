//! Plain-text rendering for terminal output.

use medledger_core::{MedicineRecord, RecentEntry, Statistics};

pub fn print_medicine(record: &MedicineRecord) {
    print!("{}", format_medicine(record));
}

pub fn format_medicine(record: &MedicineRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", record.name));
    out.push_str(&format!("  Composition: {}\n", record.composition));
    out.push_str(&format!("  Date Added: {}\n", record.date_added));
    out.push_str("  Generic Alternatives:\n");

    let generics: Vec<_> = record.present_generics().collect();
    if generics.is_empty() {
        out.push_str("    No generic alternatives found.\n");
    }
    for (i, generic) in generics.into_iter().enumerate() {
        out.push_str(&format!("    Generic {}: {}\n", i + 1, generic.name));
        out.push_str(&format!("      Composition: {}\n", generic.composition_or_default()));
        out.push_str(&format!("      Price: {}\n", generic.price_or_default()));
        out.push_str(&format!("      Side Effects: {}\n", generic.side_effects_or_default()));
    }
    out
}

pub fn print_statistics(stats: &Statistics) {
    println!("Total Medicines: {}", stats.total_medicines);
    println!("Total Generic Alternatives: {}", stats.total_generics);
    println!("Average Generics per Medicine: {}", stats.average_generics);
}

pub fn print_recent(entries: &[RecentEntry]) {
    if entries.is_empty() {
        println!("No medicines added yet.");
        return;
    }
    for entry in entries {
        println!("{}", entry.name);
        println!("  Composition: {}", entry.composition_preview);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medledger_core::GenericEntry;

    #[test]
    fn test_format_uses_fallbacks() {
        let mut record = MedicineRecord::new("Panadol".into(), "Paracetamol".into(), "t".into());
        record.generics = vec![GenericEntry::new("Calpol", "", "5.00", "")];

        let text = format_medicine(&record);
        assert!(text.contains("Generic 1: Calpol"));
        assert!(text.contains("Composition: Not specified"));
        assert!(text.contains("Price: 5.00"));
        assert!(text.contains("Side Effects: Not specified"));
    }

    #[test]
    fn test_format_skips_blank_named_generics() {
        let mut record = MedicineRecord::new("Panadol".into(), "Paracetamol".into(), "t".into());
        record.generics = vec![
            GenericEntry::new("  ", "", "", ""),
            GenericEntry::new("Calpol", "Paracetamol", "5.00", "None"),
        ];

        let text = format_medicine(&record);
        assert!(text.contains("Generic 1: Calpol"));
        assert!(!text.contains("Generic 2"));
        assert!(!text.contains("Not specified"));
    }

    #[test]
    fn test_format_without_generics() {
        let record = MedicineRecord::new("Aspirin".into(), "ASA".into(), "t".into());
        assert!(format_medicine(&record).contains("No generic alternatives found."));
    }
}
