use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::marker::PhantomData;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, DTOs, and Actions)
// =============================================================================

/// Trait that any table row must implement to be managed by a [`Table`].
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Table name used in logs.
    const NAME: &'static str;

    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    type Error: std::error::Error + Clone + Send + Sync + 'static + From<FrameworkError>;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Key taken from the create params for tables with a natural key.
    /// Tables without one fall back to the actor's id generator.
    fn natural_id(_params: &Self::CreateParams) -> Option<Self::Id> {
        None
    }

    /// Construct the full Entity from the ID and create params
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    /// Unique-constraint check against an existing row.
    fn conflicts_with(&self, _existing: &Self) -> bool {
        false
    }

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

/// Failures raised by the framework itself rather than by an entity hook.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("No key for new row in {0}")]
    MissingKey(&'static str),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, E>>;

/// Row predicate carried by list and bulk-delete requests.
pub struct Filter<T>(Box<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Filter<T> {
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(predicate))
    }

    pub fn all() -> Self {
        Self::new(|_| true)
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.0)(item)
    }
}

impl<T> Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        filter: Filter<T>,
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    DeleteWhere {
        filter: Filter<T>,
        respond_to: Response<usize, T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

// =============================================================================
// 3. THE TABLE (rows + hooks, shared by every actor that owns data)
// =============================================================================

pub struct Table<T: Entity> {
    rows: HashMap<T::Id, T>,
    next_id_fn: Option<Box<dyn Fn() -> T::Id + Send + Sync>>,
}

impl<T: Entity> Table<T> {
    pub fn new(next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static) -> Self {
        Self {
            rows: HashMap::new(),
            next_id_fn: Some(Box::new(next_id_fn)),
        }
    }

    /// A table whose rows are always keyed by [`Entity::natural_id`].
    pub fn keyed() -> Self {
        Self {
            rows: HashMap::new(),
            next_id_fn: None,
        }
    }

    pub fn next_id(&self) -> Result<T::Id, FrameworkError> {
        self.next_id_fn
            .as_ref()
            .map(|next| next())
            .ok_or(FrameworkError::MissingKey(T::NAME))
    }

    pub fn get<Q>(&self, id: &Q) -> Option<&T>
    where
        T::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.rows.get(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn create(&mut self, params: T::CreateParams) -> Result<T, T::Error> {
        let id = match T::natural_id(&params) {
            Some(id) => id,
            None => self.next_id()?,
        };
        if self.rows.contains_key(&id) {
            return Err(FrameworkError::AlreadyExists(id.to_string()).into());
        }
        let mut item = T::from_create_params(id.clone(), params)?;
        item.on_create()?;
        if let Some(existing) = self.rows.values().find(|row| item.conflicts_with(row)) {
            return Err(FrameworkError::AlreadyExists(existing.id().to_string()).into());
        }
        self.rows.insert(id, item.clone());
        Ok(item)
    }

    pub fn list(&self, filter: &Filter<T>) -> Vec<T> {
        self.rows
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect()
    }

    /// Hooks run on a copy; the stored row changes only when the hook succeeds.
    pub fn update(&mut self, id: &T::Id, patch: T::Patch) -> Result<T, T::Error> {
        let mut item = self.require(id)?.clone();
        item.on_update(patch)?;
        self.rows.insert(id.clone(), item.clone());
        Ok(item)
    }

    pub fn delete(&mut self, id: &T::Id) -> Result<(), T::Error> {
        self.require(id)?.on_delete()?;
        self.rows.remove(id);
        Ok(())
    }

    pub fn delete_where(&mut self, filter: &Filter<T>) -> Result<usize, T::Error> {
        let doomed: Vec<T::Id> = self
            .rows
            .values()
            .filter(|item| filter.matches(item))
            .map(|item| item.id().clone())
            .collect();
        for id in &doomed {
            self.delete(id)?;
        }
        Ok(doomed.len())
    }

    pub fn perform(&mut self, id: &T::Id, action: T::Action) -> Result<T::ActionResult, T::Error> {
        let mut item = self.require(id)?.clone();
        let result = item.handle_action(action)?;
        self.rows.insert(id.clone(), item);
        Ok(result)
    }

    /// Writes a row produced elsewhere (a committed unit of work).
    pub fn put(&mut self, item: T) {
        self.rows.insert(item.id().clone(), item);
    }

    fn require(&self, id: &T::Id) -> Result<&T, T::Error> {
        self.rows
            .get(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()).into())
    }

    /// Serves one request and answers on its oneshot channel.
    pub fn handle(&mut self, request: ResourceRequest<T>) {
        match request {
            ResourceRequest::Create { params, respond_to } => {
                let result = self.create(params);
                match &result {
                    Ok(item) => debug!(table = T::NAME, id = %item.id(), "Row created"),
                    Err(e) => warn!(table = T::NAME, error = %e, "Create rejected"),
                }
                let _ = respond_to.send(result);
            }
            ResourceRequest::Get { id, respond_to } => {
                let _ = respond_to.send(Ok(self.rows.get(&id).cloned()));
            }
            ResourceRequest::List { filter, respond_to } => {
                let _ = respond_to.send(Ok(self.list(&filter)));
            }
            ResourceRequest::Update { id, patch, respond_to } => {
                let _ = respond_to.send(self.update(&id, patch));
            }
            ResourceRequest::Delete { id, respond_to } => {
                let _ = respond_to.send(self.delete(&id));
            }
            ResourceRequest::DeleteWhere { filter, respond_to } => {
                let _ = respond_to.send(self.delete_where(&filter));
            }
            ResourceRequest::Action { id, action, respond_to } => {
                let _ = respond_to.send(self.perform(&id, action));
            }
        }
    }
}

// =============================================================================
// 4. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    table: Table<T>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        Self::with_table(buffer_size, Table::new(next_id_fn))
    }

    /// Actor for a table keyed by [`Entity::natural_id`].
    pub fn keyed(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::with_table(buffer_size, Table::keyed())
    }

    fn with_table(buffer_size: usize, table: Table<T>) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver, table }, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", skip(self), fields(table = T::NAME))]
    pub async fn run(mut self) {
        info!("Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            self.table.handle(msg);
        }
        info!(rows = self.table.len(), "Actor stopped");
    }
}

// =============================================================================
// 5. THE GENERIC CLIENT
// =============================================================================

/// Typed handle to a table. `M` is the message type of the actor that owns the
/// table, so one actor can host several tables behind separate clients.
pub struct ResourceClient<T: Entity, M = ResourceRequest<T>> {
    sender: mpsc::Sender<M>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity, M> Clone for ResourceClient<T, M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T, M> ResourceClient<T, M>
where
    T: Entity,
    M: From<ResourceRequest<T>> + Send + 'static,
{
    pub fn new(sender: mpsc::Sender<M>) -> Self {
        Self {
            sender,
            _entity: PhantomData,
        }
    }

    async fn call<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(M::from(build(respond_to)))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, T::Error> {
        self.call(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, T::Error> {
        self.call(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self, filter: Filter<T>) -> Result<Vec<T>, T::Error> {
        self.call(|respond_to| ResourceRequest::List { filter, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        self.call(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), T::Error> {
        self.call(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn delete_where(&self, filter: Filter<T>) -> Result<usize, T::Error> {
        self.call(|respond_to| ResourceRequest::DeleteWhere { filter, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, T::Error> {
        self.call(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 6. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    // --- Domain Definition ---

    #[derive(Debug, Clone, Error, PartialEq)]
    enum TagError {
        #[error("tag framework: {0}")]
        Framework(#[from] FrameworkError),
        #[error("tag rejected: {0}")]
        Rejected(String),
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Tag {
        id: String,
        slug: String,
        pinned: bool,
    }

    #[derive(Debug)]
    struct TagCreate {
        slug: String,
    }

    #[derive(Debug)]
    struct TagPatch {
        slug: Option<String>,
    }

    #[derive(Debug)]
    enum TagAction {
        Pin,
    }

    impl Entity for Tag {
        const NAME: &'static str = "tags";
        type Id = String;
        type CreateParams = TagCreate;
        type Patch = TagPatch;
        type Action = TagAction;
        type ActionResult = bool;
        type Error = TagError;

        fn id(&self) -> &String {
            &self.id
        }

        fn from_create_params(id: String, params: TagCreate) -> Result<Self, TagError> {
            Ok(Self { id, slug: params.slug, pinned: false })
        }

        fn conflicts_with(&self, existing: &Self) -> bool {
            self.slug == existing.slug
        }

        fn on_update(&mut self, patch: TagPatch) -> Result<(), TagError> {
            if let Some(slug) = patch.slug {
                if slug.is_empty() {
                    return Err(TagError::Rejected("empty slug".into()));
                }
                self.slug = slug;
            }
            Ok(())
        }

        fn handle_action(&mut self, action: TagAction) -> Result<bool, TagError> {
            match action {
                TagAction::Pin => {
                    let changed = !self.pinned;
                    self.pinned = true;
                    Ok(changed)
                }
            }
        }
    }

    fn spawn_tags() -> ResourceClient<Tag> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("tag_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = spawn_tags();

        let tag = client.create(TagCreate { slug: "sale".into() }).await.unwrap();
        assert_eq!(tag.id, "tag_1");

        let changed = client.perform_action(tag.id.clone(), TagAction::Pin).await.unwrap();
        assert!(changed);
        let stored = client.get(tag.id.clone()).await.unwrap().unwrap();
        assert!(stored.pinned);

        let changed_again = client.perform_action(tag.id.clone(), TagAction::Pin).await.unwrap();
        assert!(!changed_again);
    }

    #[tokio::test]
    async fn test_unique_constraint_rejects_duplicate() {
        let client = spawn_tags();
        client.create(TagCreate { slug: "new".into() }).await.unwrap();

        let err = client.create(TagCreate { slug: "new".into() }).await.unwrap_err();
        assert_eq!(err, TagError::Framework(FrameworkError::AlreadyExists("tag_1".into())));
        assert_eq!(client.list(Filter::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_row_untouched() {
        let client = spawn_tags();
        let tag = client.create(TagCreate { slug: "eid".into() }).await.unwrap();

        let err = client
            .update(tag.id.clone(), TagPatch { slug: Some(String::new()) })
            .await
            .unwrap_err();
        assert!(matches!(err, TagError::Rejected(_)));
        assert_eq!(client.get(tag.id).await.unwrap().unwrap().slug, "eid");
    }

    #[tokio::test]
    async fn test_delete_where_and_missing_rows() {
        let client = spawn_tags();
        for slug in ["a", "b", "c"] {
            client.create(TagCreate { slug: slug.into() }).await.unwrap();
        }

        let removed = client
            .delete_where(Filter::new(|t: &Tag| t.slug != "b"))
            .await
            .unwrap();
        assert_eq!(removed, 2);

        let err = client.delete("tag_1".into()).await.unwrap_err();
        assert_eq!(err, TagError::Framework(FrameworkError::NotFound("tag_1".into())));
    }
}
