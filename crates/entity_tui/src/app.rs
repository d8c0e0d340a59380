use voxel_api_core::ops::entities;
use voxel_api_core::{
    ApiClient, ApiError, Component, ComponentFilter, ComponentKind, EntityId, EntityInfo, Model,
    Positionable, Result, Transport,
};

use crate::edit::EditSession;
use crate::input::Key;
use crate::listing::EntityList;

const DEFAULT_VISIBLE_ROWS: usize = 10;

/// Components of the selected entity as last fetched from the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Details {
    pub entity_id: EntityId,
    pub positionable: Option<Positionable>,
    pub model: Option<Model>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browsing,
    Editing(EditSession),
}

/// Outcome of writing the pending buffer back to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Commit {
    /// Nothing was typed.
    Nothing,
    Sent,
    /// Rejected locally or by the server; the cursor must not move.
    Blocked,
}

/// Editor state. Every server exchange goes through the one client, so the
/// editor only ever has a single request in flight.
///
/// Methods return `Err` only for errors that end the session (lost
/// connection, closed client). Everything else lands in the status line.
pub struct App<T: Transport> {
    client: ApiClient<T>,
    filter: ComponentFilter,
    list: EntityList,
    details: Option<Details>,
    mode: Mode,
    status: String,
    quit: bool,
}

impl<T: Transport> App<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        Self {
            client,
            filter: ComponentFilter::Any,
            list: EntityList::new(DEFAULT_VISIBLE_ROWS),
            details: None,
            mode: Mode::Browsing,
            status: String::new(),
            quit: false,
        }
    }

    /// Initial listing and details.
    pub async fn load(&mut self) -> Result<()> {
        let entities = self.fetch_entities().await?;
        self.list.reset(entities);
        self.load_details().await
    }

    pub fn filter(&self) -> ComponentFilter {
        self.filter
    }

    pub fn list(&self) -> &EntityList {
        &self.list
    }

    pub fn details(&self) -> Option<&Details> {
        self.details.as_ref()
    }

    #[cfg(test)]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.mode {
            Mode::Editing(session) => Some(session),
            Mode::Browsing => None,
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn set_visible_rows(&mut self, rows: usize) {
        self.list.set_visible_rows(rows);
    }

    pub async fn close(&mut self) -> Result<()> {
        self.client.close().await
    }

    pub async fn handle_key(&mut self, key: Key) -> Result<()> {
        if key == Key::Interrupt {
            self.quit = true;
            return Ok(());
        }

        match self.mode {
            Mode::Browsing => self.handle_browsing(key).await,
            Mode::Editing(_) => self.handle_editing(key).await,
        }
    }

    async fn handle_browsing(&mut self, key: Key) -> Result<()> {
        match key {
            Key::Char('q' | 'Q') => self.quit = true,
            Key::Up | Key::Char('k') => {
                if self.list.select_prev() {
                    self.load_details().await?;
                }
            }
            Key::Down | Key::Char('j') => {
                if self.list.select_next() {
                    self.load_details().await?;
                }
            }
            Key::Char('f' | 'F') => {
                self.filter = self.filter.next();
                let entities = self.fetch_entities().await?;
                self.list.reset(entities);
                self.load_details().await?;
            }
            Key::Char('r' | 'R') => self.reload().await?,
            Key::Char('n' | 'N') => self.create_entity().await?,
            Key::Char('p' | 'P') => self.start_add(ComponentKind::Positionable).await?,
            Key::Char('m' | 'M') => self.start_add(ComponentKind::Model).await?,
            Key::Right => self.begin_edit().await?,
            _ => {}
        }
        Ok(())
    }

    async fn handle_editing(&mut self, key: Key) -> Result<()> {
        match key {
            Key::Esc => {
                self.mode = Mode::Browsing;
                self.status = "Edit cancelled".to_string();
                self.reload().await?;
            }
            Key::Backspace => {
                if let Mode::Editing(session) = &mut self.mode {
                    session.backspace();
                }
            }
            Key::Char(c) => {
                if let Mode::Editing(session) = &mut self.mode {
                    session.push_char(c);
                }
            }
            Key::Enter => {
                self.commit().await?;
            }
            Key::Left | Key::Right | Key::Up | Key::Down | Key::Tab | Key::BackTab => {
                let commit = self.commit().await?;
                if commit == Commit::Blocked {
                    return Ok(());
                }

                let Mode::Editing(session) = &mut self.mode else {
                    return Ok(());
                };
                match key {
                    Key::Right => session.advance(),
                    Key::Up => session.prev_field(),
                    Key::Down => session.next_field(),
                    Key::Tab => session.cycle_next(),
                    Key::BackTab => session.cycle_prev(),
                    Key::Left => {
                        if !session.retreat() {
                            self.mode = Mode::Browsing;
                            if commit == Commit::Nothing {
                                self.status = "Edit complete".to_string();
                            }
                            self.reload().await?;
                        }
                    }
                    _ => {}
                }
            }
            Key::Interrupt => self.quit = true,
        }
        Ok(())
    }

    /// Writes the pending buffer into its slot and sends the owning component:
    /// an edit if the entity already has it, an add otherwise.
    async fn commit(&mut self) -> Result<Commit> {
        let Mode::Editing(session) = &mut self.mode else {
            return Ok(Commit::Nothing);
        };

        let kind = match session.commit_slot() {
            Ok(Some(kind)) => kind,
            Ok(None) => return Ok(Commit::Nothing),
            Err(e) => {
                self.status = input_message(e);
                return Ok(Commit::Blocked);
            }
        };
        let component = match session.component(kind) {
            Ok(Some(component)) => component,
            Ok(None) => return Ok(Commit::Nothing),
            Err(e) => {
                self.status = input_message(e);
                return Ok(Commit::Blocked);
            }
        };
        let entity_id = session.entity_id;
        let attached = session.has(kind);

        let result = if attached {
            entities::edit_component(&mut self.client, entity_id, component).await
        } else {
            entities::add_component(&mut self.client, entity_id, component).await
        };

        let (done, failed) = if attached {
            ("updated", "update failed")
        } else {
            ("added", "add failed")
        };
        match result {
            Ok(_) => {
                if let Mode::Editing(session) = &mut self.mode {
                    session.mark_attached(kind);
                }
                self.status = format!("{} {}", kind.label(), done);
                Ok(Commit::Sent)
            }
            Err(ApiError::InvalidInput(message)) => {
                self.status = message;
                Ok(Commit::Blocked)
            }
            Err(e @ ApiError::OperationFailed { .. }) => {
                tracing::warn!("Commit for entity {} failed: {}", entity_id, e);
                self.status = format!("{} {}", kind.label(), failed);
                Ok(Commit::Blocked)
            }
            Err(e) if e.is_recoverable() => {
                tracing::warn!("Commit for entity {} failed: {}", entity_id, e);
                self.status = format!("{} {} ({})", kind.label(), failed, e);
                Ok(Commit::Blocked)
            }
            Err(e) => Err(e),
        }
    }

    async fn begin_edit(&mut self) -> Result<()> {
        let Some(entity_id) = self.selected_id() else {
            return Ok(());
        };
        let Some(details) = self.fetch_details(entity_id).await? else {
            return Ok(());
        };

        let session = EditSession::new(
            entity_id,
            details.positionable.as_ref(),
            details.model.as_ref(),
            details.positionable.is_some(),
            details.model.is_some(),
        );
        self.details = Some(details);

        match session {
            Some(session) => {
                self.mode = Mode::Editing(session);
                self.status = "Editing components".to_string();
            }
            None => self.status = "No editable components for this entity".to_string(),
        }
        Ok(())
    }

    /// Opens an editing session with a default component of `kind` that will
    /// be added on the first commit.
    async fn start_add(&mut self, kind: ComponentKind) -> Result<()> {
        let Some(entity_id) = self.selected_id() else {
            return Ok(());
        };
        let Some(details) = self.fetch_details(entity_id).await? else {
            return Ok(());
        };

        let has_positionable = details.positionable.is_some();
        let has_model = details.model.is_some();
        let (positionable, model, prompt) = match kind {
            ComponentKind::Positionable if has_positionable => {
                self.status = "Positionable already present (use → to edit)".to_string();
                self.details = Some(details);
                return Ok(());
            }
            ComponentKind::Model if has_model => {
                self.status = "Model already present (use → to edit)".to_string();
                self.details = Some(details);
                return Ok(());
            }
            ComponentKind::Positionable => (
                Some(Positionable::default()),
                details.model.clone(),
                "Add Positionable (type to change; Enter to save)",
            ),
            ComponentKind::Model => (
                details.positionable,
                Some(Model::default()),
                "Add Model (type path; Enter to save)",
            ),
        };
        self.details = Some(details);

        if let Some(mut session) = EditSession::new(
            entity_id,
            positionable.as_ref(),
            model.as_ref(),
            has_positionable,
            has_model,
        ) {
            session.focus(kind);
            self.mode = Mode::Editing(session);
            self.status = prompt.to_string();
        }
        Ok(())
    }

    async fn create_entity(&mut self) -> Result<()> {
        match entities::create_entity(&mut self.client).await {
            Ok(_) => {}
            Err(e) if e.is_recoverable() => {
                tracing::warn!("Entity create failed: {}", e);
                self.status = "Entity create failed".to_string();
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        let entities = self.fetch_entities().await?;
        self.list.replace(entities);
        if let Some(newest) = self.list.newest_id() {
            self.list.select_id(newest);
        }
        self.load_details().await?;

        self.status = match self.filter {
            ComponentFilter::Any => "Entity created".to_string(),
            _ => "Entity created. It may be hidden by filter until it has a component."
                .to_string(),
        };
        Ok(())
    }

    /// Re-lists under the current filter, keeping the selection index.
    async fn reload(&mut self) -> Result<()> {
        let entities = self.fetch_entities().await?;
        self.list.replace(entities);
        self.load_details().await
    }

    async fn load_details(&mut self) -> Result<()> {
        self.details = match self.selected_id() {
            Some(entity_id) => self.fetch_details(entity_id).await?,
            None => None,
        };
        Ok(())
    }

    /// An empty listing stands in for a failed one.
    async fn fetch_entities(&mut self) -> Result<Vec<EntityInfo>> {
        let result = entities::list_entities(&mut self.client, self.filter).await;
        Ok(self.recover(result)?.unwrap_or_default())
    }

    async fn fetch_details(&mut self, entity_id: EntityId) -> Result<Option<Details>> {
        let positionable = entities::get_component(
            &mut self.client,
            entity_id,
            ComponentKind::Positionable,
        )
        .await;
        let Some(positionable) = self.recover(positionable)? else {
            return Ok(None);
        };

        let model = entities::get_component(&mut self.client, entity_id, ComponentKind::Model).await;
        let Some(model) = self.recover(model)? else {
            return Ok(None);
        };

        Ok(Some(Details {
            entity_id,
            positionable: positionable.as_ref().and_then(Component::as_positionable).copied(),
            model: model.as_ref().and_then(Component::as_model).cloned(),
        }))
    }

    fn selected_id(&self) -> Option<EntityId> {
        self.list.selected().map(|e| e.entity_id)
    }

    /// Moves a recoverable error into the status line.
    fn recover<V>(&mut self, result: Result<V>) -> Result<Option<V>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_recoverable() => {
                tracing::warn!("Request failed: {}", e);
                self.status = e.to_string();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn input_message(error: ApiError) -> String {
    match error {
        ApiError::InvalidInput(message) => message,
        other => other.to_string(),
    }
}
