/// Generates `get_<entity>` and `list_<entities>` on a client holding an
/// `inner: ResourceClient<..>` field.
#[macro_export]
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $id:ty, $error:ty, $entity_name_snake:ident, $plural_snake:ident) => {
        paste::paste! {
            #[allow(dead_code)]
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: $id) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await
                }

                #[tracing::instrument(skip(self, filter))]
                pub async fn [<list_ $plural_snake>](
                    &self,
                    filter: $crate::actor_framework::Filter<$entity>,
                ) -> Result<Vec<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.list(filter).await
                }
            }
        }
    };
}
