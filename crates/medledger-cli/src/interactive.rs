//! Line-based add-medicine form.
//!
//! Mirrors the desktop form: required name and composition, then a command
//! loop to add, remove and edit generic sub-entries before saving. Failed
//! saves keep everything entered so far.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use medledger_core::{FormError, MedicineForm, MedicineRecord, Store, MAX_GENERICS};

const HELP: &str = "Commands: a = add generic, r N = remove generic N, l = list, s = save, q = quit";

/// Add one generic from a `NAME|COMPOSITION|PRICE|SIDE_EFFECTS` spec.
///
/// Missing trailing parts are left blank.
pub fn push_generic_spec(form: &mut MedicineForm, spec: &str) -> Result<()> {
    let mut parts = spec.splitn(4, '|').map(str::to_string);
    let id = form.add_generic()?;
    let draft = form.generic_mut(&id)?;
    draft.name = parts.next().unwrap_or_default();
    draft.composition = parts.next().unwrap_or_default();
    draft.price = parts.next().unwrap_or_default();
    draft.side_effects = parts.next().unwrap_or_default();
    Ok(())
}

/// Interactive session over any line source and sink.
pub struct FormSession<R, W> {
    form: MedicineForm,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> FormSession<R, W> {
    pub fn new(form: MedicineForm, input: R, output: W) -> Self {
        Self {
            form,
            input,
            output,
        }
    }

    pub fn form(&self) -> &MedicineForm {
        &self.form
    }

    /// Run until saved (`Some`) or abandoned (`None`).
    pub fn run(&mut self, store: &Store) -> Result<Option<MedicineRecord>> {
        writeln!(self.output, "Add New Medicine")?;
        if self.form.name.trim().is_empty() {
            self.form.name = self.prompt("Medicine Name *")?;
        }
        if self.form.composition.trim().is_empty() {
            self.form.composition = self.prompt("Composition *")?;
        }
        writeln!(self.output, "{}", HELP)?;

        loop {
            let line = self.prompt(">")?;
            let mut words = line.split_whitespace();
            match words.next() {
                Some("a") => self.add_generic()?,
                Some("r") => {
                    let position = words.next().and_then(|n| n.parse::<usize>().ok());
                    self.remove_generic(position)?;
                }
                Some("l") => self.list()?,
                Some("s") => match self.form.save(store) {
                    Ok(record) => {
                        writeln!(self.output, "Medicine saved successfully!")?;
                        return Ok(Some(record));
                    }
                    Err(FormError::MissingRequired) => {
                        writeln!(self.output, "{}", FormError::MissingRequired)?;
                        self.fill_required()?;
                    }
                    Err(e) => writeln!(self.output, "{}", e)?,
                },
                Some("q") => return Ok(None),
                _ => writeln!(self.output, "{}", HELP)?,
            }
        }
    }

    fn add_generic(&mut self) -> Result<()> {
        if !self.form.can_add_generic() {
            writeln!(self.output, "Maximum {} generics allowed!", MAX_GENERICS)?;
            return Ok(());
        }
        let label = medledger_core::form::generic_label(self.form.generics().len());
        writeln!(self.output, "{}", label)?;
        let name = self.prompt("  Name")?;
        let composition = self.prompt("  Composition")?;
        let price = self.prompt("  Price")?;
        let side_effects = self.prompt("  Side Effects")?;

        let id = self.form.add_generic()?;
        let draft = self.form.generic_mut(&id)?;
        draft.name = name;
        draft.composition = composition;
        draft.price = price;
        draft.side_effects = side_effects;
        Ok(())
    }

    fn remove_generic(&mut self, position: Option<usize>) -> Result<()> {
        let labels = self.form.labels();
        let id = position
            .filter(|&n| n >= 1)
            .and_then(|n| labels.get(n - 1))
            .map(|(id, _)| id.clone());
        match id {
            Some(id) => {
                self.form.remove_generic(&id)?;
                self.list()
            }
            None => {
                writeln!(self.output, "No such generic; use 'l' to list")?;
                Ok(())
            }
        }
    }

    fn list(&mut self) -> Result<()> {
        if self.form.generics().is_empty() {
            writeln!(self.output, "No generics added.")?;
        }
        for ((_, label), draft) in self.form.labels().iter().zip(self.form.generics()) {
            writeln!(self.output, "{}: {}", label, draft.name)?;
        }
        Ok(())
    }

    fn fill_required(&mut self) -> Result<()> {
        if self.form.name.trim().is_empty() {
            self.form.name = self.prompt("Medicine Name *")?;
        }
        if self.form.composition.trim().is_empty() {
            self.form.composition = self.prompt("Composition *")?;
        }
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{} ", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed before the form was saved");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("medicines.csv")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_push_generic_spec() {
        let mut form = MedicineForm::new();
        push_generic_spec(&mut form, "Calpol|Paracetamol|5.00").unwrap();
        let draft = &form.generics()[0];
        assert_eq!(draft.name, "Calpol");
        assert_eq!(draft.price, "5.00");
        assert_eq!(draft.side_effects, "");
    }

    #[test]
    fn test_push_generic_spec_limit() {
        let mut form = MedicineForm::new();
        for i in 0..MAX_GENERICS {
            push_generic_spec(&mut form, &format!("G{}", i)).unwrap();
        }
        assert!(push_generic_spec(&mut form, "extra").is_err());
    }

    #[test]
    fn test_session_add_remove_save() {
        let (_dir, store) = temp_store();
        let script = "Panadol\nParacetamol\na\nFirst\n\n\n\na\nCalpol\nParacetamol\n5.00\nNone\nr 1\ns\n";
        let mut out = Vec::new();
        let mut session = FormSession::new(MedicineForm::new(), Cursor::new(script), &mut out);

        let record = session.run(&store).unwrap().unwrap();
        assert_eq!(record.generics.len(), 1);
        assert_eq!(record.generics[0].name, "Calpol");

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Generic 1: Calpol"));
        assert_eq!(store.read_all_rows().unwrap().len(), 1);
    }

    #[test]
    fn test_session_reprompts_missing_composition() {
        let (_dir, store) = temp_store();
        let script = "Panadol\n\ns\nParacetamol\ns\n";
        let mut out = Vec::new();
        let mut session = FormSession::new(MedicineForm::new(), Cursor::new(script), &mut out);

        let record = session.run(&store).unwrap().unwrap();
        assert_eq!(record.composition, "Paracetamol");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Medicine Name and Composition are required"));
    }

    #[test]
    fn test_session_quit_writes_nothing() {
        let (_dir, store) = temp_store();
        let mut out = Vec::new();
        let mut session =
            FormSession::new(MedicineForm::new(), Cursor::new("Panadol\nParacetamol\nq\n"), &mut out);

        assert!(session.run(&store).unwrap().is_none());
        assert_eq!(session.form().name, "Panadol");
        assert!(store.read_all_rows().unwrap().is_empty());
    }
}
