use leadform::form::{FieldKey, FormModel};

#[derive(leadform::form::FormModel)]
struct LeadForm {
    email: String,
    goals: &'static str,
}

fn main() {
    let form = LeadForm {
        email: "a@lead.form".to_string(),
        goals: "crescer",
    };
    let values = form.to_values();
    assert_eq!(LeadForm::FIELDS.len(), 2);
    assert_eq!(values.get(&FieldKey::new("email")), Some("a@lead.form"));
    assert_eq!(values.get(&FieldKey::new("goals")), Some("crescer"));
}
