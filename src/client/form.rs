//! State of the "new collection" dialog

use tracing::error;

use super::{ClientError, CollectionContext};
use crate::domain::Collection;

const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCollectionForm {
    pub name: String,
    pub language: String,
    pub open: bool,
}

impl Default for CreateCollectionForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            open: false,
        }
    }
}

impl CreateCollectionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_dialog(&mut self) {
        self.open = true;
    }

    /// Close without submitting; typed values are kept
    pub fn close_dialog(&mut self) {
        self.open = false;
    }

    /// Create the collection described by the form.
    ///
    /// A blank name is rejected locally. On success the fields go back to
    /// their defaults and the dialog closes; on failure they are kept so
    /// the user can retry.
    pub async fn submit(
        &mut self,
        context: &mut CollectionContext,
    ) -> Result<Collection, ClientError> {
        let toaster = context.toaster().clone();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            toaster.error("Collection name is required");
            return Err(ClientError::Validation(
                "collection name is required".to_string(),
            ));
        }

        match context
            .create_collection(&name, Some(self.language.as_str()))
            .await
        {
            Ok(collection) => {
                *self = Self::default();
                toaster.success(format!("Collection \"{}\" created", collection.name));
                Ok(collection)
            }
            Err(e) => {
                error!("Failed to create collection: {}", e);
                toaster.error("Failed to create collection");
                Err(e)
            }
        }
    }
}
