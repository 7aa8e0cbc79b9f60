use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::user::get_current_user,
        api::collections::list_collections,
        api::collections::create_collection,
        api::collections::get_collection,
        api::collections::update_collection,
        api::collections::delete_collection,
        api::collection_cards::list_collection_cards,
        api::collection_cards::add_collection_card,
        api::collection_cards::set_collection_card_quantity,
        api::collection_cards::remove_collection_card,
        api::stats::get_stats,
        api::search::search,
        api::sets::list_sets,
        api::sets::get_set,
        api::sets::ingest_set,
    ),
    tags(
        (name = "cardvault", description = "CardVault collection API")
    )
)]
pub struct ApiDoc;
