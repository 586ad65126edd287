//! Diesel table definitions.

diesel::table! {
    assets (id) {
        id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        asset_type -> Text,
        url -> Text,
        thumbnail_url -> Nullable<Text>,
        preview_url -> Nullable<Text>,
        size_bytes -> Nullable<Int8>,
        width -> Nullable<Int4>,
        height -> Nullable<Int4>,
        duration_seconds -> Nullable<Float4>,
        tags -> Jsonb,
        categories -> Jsonb,
        is_favourite -> Bool,
        usage_count -> Int8,
        owner_id -> Uuid,
        client_id -> Uuid,
        metadata -> Jsonb,
        processing_warnings -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    clients (id) {
        id -> Uuid,
        slug -> Text,
        name -> Text,
    }
}

diesel::table! {
    owners (id) {
        id -> Uuid,
        display_name -> Text,
    }
}

diesel::joinable!(assets -> clients (client_id));
diesel::joinable!(assets -> owners (owner_id));

diesel::allow_tables_to_appear_in_same_query!(assets, clients, owners);
