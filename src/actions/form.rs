use tracing::debug;

use crate::app::{AppMode, AppState, FormField, FormKind, FormState};
use crate::model::{GeneralLedgerType, GroupingDraft, GroupingId};
use crate::outbox::Mutation;

use super::sync::queue;

pub fn open_create_form(app: &mut AppState, parent: Option<GroupingId>) {
    // Inherit the parent's classification, which is what users pick anyway.
    let general_ledger_type = parent
        .as_ref()
        .and_then(|id| app.tree.get(id))
        .map_or(GeneralLedgerType::default(), |n| n.general_ledger_type);
    app.mode = AppMode::Form(FormState {
        kind: FormKind::Create,
        target: parent,
        name: String::new(),
        description: String::new(),
        general_ledger_type,
        field: FormField::Name,
    });
}

pub fn open_edit_form(app: &mut AppState, id: &GroupingId, read_only: bool) {
    let Some(node) = app.tree.get(id) else {
        return;
    };
    app.mode = AppMode::Form(FormState {
        kind: if read_only { FormKind::View } else { FormKind::Edit },
        target: Some(id.clone()),
        name: node.name.clone(),
        description: node.description.clone().unwrap_or_default(),
        general_ledger_type: node.general_ledger_type,
        field: FormField::Name,
    });
}

fn editable_form(app: &mut AppState) -> Option<&mut FormState> {
    match &mut app.mode {
        AppMode::Form(form) if !form.is_read_only() => Some(form),
        _ => None,
    }
}

pub fn form_char(app: &mut AppState, c: char) {
    if let Some(form) = editable_form(app) {
        match form.field {
            FormField::Name => form.name.push(c),
            FormField::Description => form.description.push(c),
            FormField::GeneralLedgerType => {}
        }
    }
}

pub fn form_backspace(app: &mut AppState) {
    if let Some(form) = editable_form(app) {
        match form.field {
            FormField::Name => {
                form.name.pop();
            }
            FormField::Description => {
                form.description.pop();
            }
            FormField::GeneralLedgerType => {}
        }
    }
}

pub fn form_next_field(app: &mut AppState) {
    if let AppMode::Form(form) = &mut app.mode {
        form.field = form.field.next();
    }
}

pub fn form_cycle_type(app: &mut AppState) {
    if let Some(form) = editable_form(app) {
        form.general_ledger_type = form.general_ledger_type.cycle();
    }
}

/// Validates the form and queues a create or update request.
/// A read-only form just closes.
pub fn form_submit(app: &mut AppState) {
    let AppMode::Form(form) = &app.mode else {
        return;
    };
    let form = form.clone();

    if form.is_read_only() {
        app.mode = AppMode::Normal;
        return;
    }
    if form.name.trim().is_empty() {
        app.set_message("Name is required");
        return;
    }

    let description = form.description.trim();
    let draft = GroupingDraft {
        name: form.name.trim().to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        general_ledger_type: form.general_ledger_type,
    };
    let mutation = match (form.kind, form.target) {
        (FormKind::Create, parent) => Mutation::Create { parent, draft },
        (FormKind::Edit, Some(id)) => Mutation::Update { id, draft },
        (kind, target) => {
            debug!(?kind, ?target, "form submitted without a target");
            app.mode = AppMode::Normal;
            return;
        }
    };
    queue(app, mutation);
    app.mode = AppMode::Normal;
}
