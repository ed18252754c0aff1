pub mod destination_asset;
pub mod gateway;
pub mod initialize_destination;
pub mod source_asset;
