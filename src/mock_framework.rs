//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] or [`create_mock_store`] to get a client and the
//! receiving end of its channel. The test then plays the actor with helpers
//! like [`expect_get`] or [`expect_place_order`], answering each request with
//! whatever success or failure the scenario needs.

use tokio::sync::mpsc;

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest, Response};
use crate::domain::{Order, OrderCreate, Product};
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::store::{StoreClient, StoreRequest};

/// Creates a mock client and a receiver for asserting requests.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Creates a commerce store handle whose requests land on the returned receiver.
pub fn create_mock_store(buffer_size: usize) -> (StoreClient, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Response<T, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next store message is a product Get
pub async fn expect_product_get(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(String, Response<Option<Product>, ProductError>)> {
    match receiver.recv().await {
        Some(StoreRequest::Products(ResourceRequest::Get { id, respond_to })) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next store message is an order transaction
pub async fn expect_place_order(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(OrderCreate, Response<Order, OrderError>)> {
    match receiver.recv().await {
        Some(StoreRequest::PlaceOrder { order, respond_to }) => Some((order, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Language, Role, User, UserCreate};
    use chrono::Utc;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        // Test Create
        let create_task = tokio::spawn(async move {
            let user = UserCreate {
                username: "test".to_string(),
                email: "test@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Customer,
                preferred_language: Language::En,
            };
            client.create(user).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.username, "test");
        let user = User {
            id: "user_1".to_string(),
            username: payload.username,
            email: payload.email,
            password_hash: payload.password_hash,
            role: payload.role,
            preferred_language: payload.preferred_language,
            created_at: Utc::now(),
        };
        responder.send(Ok(user.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(user));
    }
}
