table! {
    components (id) {
        id -> BigInt,
    }
}

table! {
    ratings (id) {
        id -> BigInt,
        name -> Text,
        component_id -> BigInt,
    }
}

table! {
    table_columns (name) {
        name -> Text,
    }
}

table! {
    table_rows (name) {
        name -> Text,
    }
}

table! {
    entities (id) {
        id -> BigInt,
        name -> Text,
        component_id -> BigInt,

        row_name -> Text,
        column_name -> Text,

        comment -> Text,
        status -> Integer,
        rating_id -> Nullable<BigInt>,
    }
}

table! {
    images (id) {
        id -> BigInt,
        path -> Text,
        entity_id -> BigInt,
    }
}

allow_tables_to_appear_in_same_query!(
    components,
    ratings,
    table_columns,
    table_rows,
    entities,
    images,
);

joinable!(ratings -> components(component_id));
joinable!(entities -> components(component_id));
joinable!(images -> entities(entity_id));
