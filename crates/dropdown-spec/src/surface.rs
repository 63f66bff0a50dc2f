use crate::form::{Form, SelectControl};

/// Host-owned container the trial renders into.
pub trait DisplaySurface {
    /// Appends a form; mounting twice keeps both copies.
    fn mount(&mut self, form: Form);

    fn forms(&self) -> &[Form];

    /// First control with the given id, in mount order.
    fn control_mut(&mut self, id: &str) -> Option<&mut SelectControl>;

    /// Removes everything rendered on the surface.
    fn clear(&mut self);

    fn contains_control(&self, id: &str) -> bool {
        self.forms().iter().any(|form| form.control(id).is_some())
    }

    fn is_empty(&self) -> bool {
        self.forms().is_empty()
    }
}

/// In-process surface used by the component boundary, the terminal host and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    forms: Vec<Form>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySurface for MemorySurface {
    fn mount(&mut self, form: Form) {
        self.forms.push(form);
    }

    fn forms(&self) -> &[Form] {
        &self.forms
    }

    fn control_mut(&mut self, id: &str) -> Option<&mut SelectControl> {
        self.forms.iter_mut().find_map(|form| form.control_mut(id))
    }

    fn clear(&mut self) {
        self.forms.clear();
    }
}
