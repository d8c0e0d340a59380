//! In-place editing of one entity's components.
//!
//! An [`EditSession`] holds an ordered list of typed fields, a cursor
//! (field index plus slot within a vector field), and the text buffer for the
//! slot under the cursor. Values are kept as the text the operator sees and
//! parsed only when a component is assembled for the server.

use voxel_api_core::{ApiError, Component, ComponentKind, EntityId, Model, Positionable, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Position,
    Rotation,
    Origin,
    Scale,
    ModelPath,
}

impl FieldKey {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Position => "Position",
            Self::Rotation => "Rotation",
            Self::Origin => "Origin",
            Self::Scale => "Scale",
            Self::ModelPath => "Path",
        }
    }

    pub fn component(&self) -> ComponentKind {
        match self {
            Self::Position | Self::Rotation | Self::Origin | Self::Scale => {
                ComponentKind::Positionable
            }
            Self::ModelPath => ComponentKind::Model,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Three numeric slots.
    Vector3 { key: FieldKey, values: [String; 3] },
    /// One numeric slot.
    Scalar { key: FieldKey, value: String },
    /// One free-text slot.
    Text { key: FieldKey, value: String },
}

impl Field {
    pub fn key(&self) -> FieldKey {
        match self {
            Self::Vector3 { key, .. } | Self::Scalar { key, .. } | Self::Text { key, .. } => *key,
        }
    }

    pub fn slots(&self) -> usize {
        match self {
            Self::Vector3 { .. } => 3,
            Self::Scalar { .. } | Self::Text { .. } => 1,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text { .. })
    }

    pub fn value(&self, slot: usize) -> &str {
        match self {
            Self::Vector3 { values, .. } => &values[slot.min(2)],
            Self::Scalar { value, .. } | Self::Text { value, .. } => value,
        }
    }

    fn set(&mut self, slot: usize, text: String) {
        match self {
            Self::Vector3 { values, .. } => values[slot.min(2)] = text,
            Self::Scalar { value, .. } | Self::Text { value, .. } => *value = text,
        }
    }

    fn vector(key: FieldKey, v: [f32; 3]) -> Self {
        Self::Vector3 {
            key,
            values: v.map(format_number),
        }
    }
}

/// Formats a float the way the editor shows it: always with a fractional part.
pub fn format_number(value: f32) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn parse_number(text: &str) -> Result<f32> {
    text.trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::invalid_input("Invalid numeric value"))
}

fn positionable_fields(p: &Positionable) -> [Field; 4] {
    [
        Field::vector(FieldKey::Position, p.position),
        Field::vector(FieldKey::Rotation, p.rotation),
        Field::vector(FieldKey::Origin, p.origin),
        Field::Scalar {
            key: FieldKey::Scale,
            value: format_number(p.scale),
        },
    ]
}

fn model_field(m: &Model) -> Field {
    Field::Text {
        key: FieldKey::ModelPath,
        value: m.path.clone(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub entity_id: EntityId,
    fields: Vec<Field>,
    index: usize,
    sub_index: usize,
    buffer: String,
    has_positionable: bool,
    has_model: bool,
}

impl EditSession {
    /// Builds the field list from the given components. `has_*` record whether
    /// the entity already carries each kind on the server; a field may exist
    /// for a kind that is still being added. Returns `None` when there would be
    /// nothing to edit.
    pub fn new(
        entity_id: EntityId,
        positionable: Option<&Positionable>,
        model: Option<&Model>,
        has_positionable: bool,
        has_model: bool,
    ) -> Option<Self> {
        let mut fields = Vec::new();
        if let Some(p) = positionable {
            fields.extend(positionable_fields(p));
        }
        if let Some(m) = model {
            fields.push(model_field(m));
        }
        if fields.is_empty() {
            return None;
        }

        Some(Self {
            entity_id,
            fields,
            index: 0,
            sub_index: 0,
            buffer: String::new(),
            has_positionable,
            has_model,
        })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, key: FieldKey) -> Option<&Field> {
        self.fields.iter().find(|f| f.key() == key)
    }

    #[cfg(test)]
    pub fn cursor(&self) -> (usize, usize) {
        (self.index, self.sub_index)
    }

    pub fn active_field(&self) -> &Field {
        &self.fields[self.index]
    }

    #[cfg(test)]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn has(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Positionable => self.has_positionable,
            ComponentKind::Model => self.has_model,
        }
    }

    pub fn mark_attached(&mut self, kind: ComponentKind) {
        match kind {
            ComponentKind::Positionable => self.has_positionable = true,
            ComponentKind::Model => self.has_model = true,
        }
    }

    /// Moves the cursor to the first field of `kind`, if any.
    pub fn focus(&mut self, kind: ComponentKind) {
        if let Some(index) = self.fields.iter().position(|f| f.key().component() == kind) {
            self.index = index;
            self.sub_index = 0;
        }
    }

    pub fn is_active(&self, field_index: usize, slot: usize) -> bool {
        self.index == field_index && self.sub_index == slot
    }

    /// What the slot should display: the pending buffer if it is being typed
    /// into, the stored value otherwise.
    pub fn display_value(&self, field_index: usize, slot: usize) -> &str {
        if self.is_active(field_index, slot) && !self.buffer.is_empty() {
            &self.buffer
        } else {
            self.fields[field_index].value(slot)
        }
    }

    /// Appends a typed character. Numeric slots take digits, one leading `-`,
    /// and one `.`; text slots take anything printable. Returns whether the
    /// character was accepted.
    pub fn push_char(&mut self, c: char) -> bool {
        let accepted = if self.active_field().is_numeric() {
            match c {
                '0'..='9' => true,
                '-' => self.buffer.is_empty(),
                '.' => !self.buffer.contains('.'),
                _ => false,
            }
        } else {
            !c.is_control()
        };

        if accepted {
            self.buffer.push(c);
        }
        accepted
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Writes the buffer into the slot under the cursor.
    ///
    /// Returns the component kind that now needs to be sent, or `None` when the
    /// buffer was empty. A malformed number is rejected and the buffer kept.
    pub fn commit_slot(&mut self) -> Result<Option<ComponentKind>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let field = &mut self.fields[self.index];
        if field.is_numeric() {
            parse_number(&self.buffer)?;
        }

        field.set(self.sub_index, std::mem::take(&mut self.buffer));
        Ok(Some(field.key().component()))
    }

    /// Assembles the full component of `kind` from the current field values.
    pub fn component(&self, kind: ComponentKind) -> Result<Option<Component>> {
        match kind {
            ComponentKind::Positionable => {
                let (Some(position), Some(rotation), Some(origin), Some(scale)) = (
                    self.field(FieldKey::Position),
                    self.field(FieldKey::Rotation),
                    self.field(FieldKey::Origin),
                    self.field(FieldKey::Scale),
                ) else {
                    return Ok(None);
                };

                Ok(Some(Component::Positionable(Positionable {
                    position: parse_vector(position)?,
                    rotation: parse_vector(rotation)?,
                    origin: parse_vector(origin)?,
                    scale: parse_number(scale.value(0))?,
                })))
            }
            ComponentKind::Model => {
                let Some(field) = self.field(FieldKey::ModelPath) else {
                    return Ok(None);
                };
                let path = field.value(0).trim();
                if path.is_empty() {
                    return Err(ApiError::invalid_input("Model path required"));
                }
                Ok(Some(Component::Model(Model::new(path))))
            }
        }
    }

    /// Right: next slot, then next field. Stays put on the last slot.
    pub fn advance(&mut self) {
        if self.sub_index + 1 < self.active_field().slots() {
            self.sub_index += 1;
        } else if self.index + 1 < self.fields.len() {
            self.index += 1;
            self.sub_index = 0;
        }
    }

    /// Left: previous slot, then last slot of the previous field. Returns
    /// `false` when already at the very first slot.
    pub fn retreat(&mut self) -> bool {
        if self.sub_index > 0 {
            self.sub_index -= 1;
        } else if self.index > 0 {
            self.index -= 1;
            self.sub_index = self.active_field().slots() - 1;
        } else {
            return false;
        }
        true
    }

    pub fn next_field(&mut self) {
        if self.index + 1 < self.fields.len() {
            self.index += 1;
            self.sub_index = 0;
        }
    }

    pub fn prev_field(&mut self) {
        if self.index > 0 {
            self.index -= 1;
            self.sub_index = 0;
        }
    }

    pub fn cycle_next(&mut self) {
        self.index = (self.index + 1) % self.fields.len();
        self.sub_index = 0;
    }

    pub fn cycle_prev(&mut self) {
        self.index = (self.index + self.fields.len() - 1) % self.fields.len();
        self.sub_index = self.active_field().slots() - 1;
    }
}

fn parse_vector(field: &Field) -> Result<[f32; 3]> {
    Ok([
        parse_number(field.value(0))?,
        parse_number(field.value(1))?,
        parse_number(field.value(2))?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_both() -> EditSession {
        EditSession::new(
            7,
            Some(&Positionable::default()),
            Some(&Model::new("models/cube.glb")),
            true,
            true,
        )
        .unwrap()
    }

    fn type_text(session: &mut EditSession, text: &str) {
        for c in text.chars() {
            session.push_char(c);
        }
    }

    #[test]
    fn test_no_components_means_no_session() {
        assert!(EditSession::new(1, None, None, false, false).is_none());
    }

    #[test]
    fn test_field_layout() {
        let session = session_with_both();
        let keys: Vec<_> = session.fields().iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            vec![
                FieldKey::Position,
                FieldKey::Rotation,
                FieldKey::Origin,
                FieldKey::Scale,
                FieldKey::ModelPath
            ]
        );
        assert_eq!(session.field(FieldKey::Scale).unwrap().value(0), "1.0");
        assert!(!session.field(FieldKey::ModelPath).unwrap().is_numeric());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1.0");
        assert_eq!(format_number(-2.0), "-2.0");
        assert_eq!(format_number(0.25), "0.25");
    }

    #[test]
    fn test_numeric_keystroke_filter() {
        let mut session = session_with_both();
        assert!(session.push_char('-'));
        assert!(session.push_char('1'));
        assert!(!session.push_char('-'));
        assert!(session.push_char('.'));
        assert!(!session.push_char('.'));
        assert!(!session.push_char('x'));
        assert!(session.push_char('5'));
        assert_eq!(session.buffer(), "-1.5");
    }

    #[test]
    fn test_text_field_accepts_any_printable() {
        let mut session = session_with_both();
        session.focus(ComponentKind::Model);
        type_text(&mut session, "q/a b.glb");
        assert!(!session.push_char('\n'));
        assert_eq!(session.buffer(), "q/a b.glb");
    }

    #[test]
    fn test_malformed_numbers_rejected_at_commit() {
        for bad in ["-", ".", "-."] {
            let mut session = session_with_both();
            type_text(&mut session, bad);
            let err = session.commit_slot().unwrap_err();
            assert!(matches!(err, ApiError::InvalidInput(_)));
            // Buffer survives so the operator can fix it.
            assert_eq!(session.buffer(), bad);
            assert_eq!(session.field(FieldKey::Position).unwrap().value(0), "0.0");
        }
    }

    #[test]
    fn test_empty_commit_is_a_no_op() {
        let mut session = session_with_both();
        assert_eq!(session.commit_slot().unwrap(), None);
        assert_eq!(session.field(FieldKey::Position).unwrap().value(0), "0.0");
    }

    #[test]
    fn test_commit_writes_slot_and_clears_buffer() {
        let mut session = session_with_both();
        session.advance();
        type_text(&mut session, "4.5");
        assert_eq!(session.display_value(0, 1), "4.5");
        assert_eq!(
            session.commit_slot().unwrap(),
            Some(ComponentKind::Positionable)
        );
        assert_eq!(session.buffer(), "");
        assert_eq!(session.field(FieldKey::Position).unwrap().value(1), "4.5");

        let component = session.component(ComponentKind::Positionable).unwrap().unwrap();
        assert_eq!(component.as_positionable().unwrap().position, [0.0, 4.5, 0.0]);
    }

    #[test]
    fn test_horizontal_navigation() {
        let mut session = session_with_both();
        session.advance();
        session.advance();
        assert_eq!(session.cursor(), (0, 2));
        session.advance();
        assert_eq!(session.cursor(), (1, 0));

        assert!(session.retreat());
        assert_eq!(session.cursor(), (0, 2));
        assert!(session.retreat());
        assert!(session.retreat());
        assert_eq!(session.cursor(), (0, 0));
        assert!(!session.retreat());
        assert_eq!(session.cursor(), (0, 0));
    }

    #[test]
    fn test_advance_stops_at_last_field() {
        let mut session = session_with_both();
        for _ in 0..20 {
            session.advance();
        }
        assert_eq!(session.cursor(), (4, 0));
    }

    #[test]
    fn test_vertical_and_cycling_navigation() {
        let mut session = session_with_both();
        session.advance();
        session.next_field();
        assert_eq!(session.cursor(), (1, 0));
        session.prev_field();
        session.prev_field();
        assert_eq!(session.cursor(), (0, 0));

        session.cycle_prev();
        assert_eq!(session.cursor(), (4, 0));
        session.cycle_next();
        assert_eq!(session.cursor(), (0, 0));
        session.cycle_next();
        session.cycle_prev();
        assert_eq!(session.cursor(), (0, 2));
    }

    #[test]
    fn test_empty_model_path_is_invalid() {
        let session =
            EditSession::new(3, None, Some(&Model::default()), false, false).unwrap();
        let err = session.component(ComponentKind::Model).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Model path required");
        assert_eq!(session.component(ComponentKind::Positionable).unwrap(), None);
    }

    #[test]
    fn test_attachment_flags() {
        let mut session =
            EditSession::new(3, Some(&Positionable::default()), None, false, false).unwrap();
        assert!(!session.has(ComponentKind::Positionable));
        session.mark_attached(ComponentKind::Positionable);
        assert!(session.has(ComponentKind::Positionable));
    }
}
