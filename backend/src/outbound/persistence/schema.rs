//! Diesel table definitions for the CRM schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, update the matching block here (or regenerate
//! it with `diesel print-schema`).

diesel::table! {
    /// Restaurant owner accounts. Emails are stored lower-cased.
    accounts (id) {
        id -> Uuid,
        email -> Varchar,
        /// Hex-encoded Argon2i digest.
        password_hash -> Varchar,
        /// Hex-encoded per-account salt.
        password_salt -> Varchar,
        first_name -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One restaurant per owner.
    restaurants (id) {
        id -> Uuid,
        owner_id -> Uuid,
        name -> Varchar,
        street_address -> Nullable<Text>,
        city -> Text,
        pincode -> Varchar,
        gstin -> Nullable<Varchar>,
        restaurant_type -> Text,
        pos_system -> Nullable<Text>,
        custom_pos_name -> Nullable<Text>,
        number_of_outlets -> Int4,
        goals -> Array<Text>,
        onboarding_complete -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Saved onboarding drafts keyed by owner.
    onboarding_progress (owner_id) {
        owner_id -> Uuid,
        step -> Int2,
        draft -> Jsonb,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    customers (id) {
        id -> Uuid,
        restaurant_id -> Uuid,
        email -> Nullable<Text>,
        phone -> Text,
        first_name -> Text,
        last_name -> Nullable<Text>,
        birthday -> Nullable<Date>,
        anniversary -> Nullable<Date>,
        total_visits -> Int4,
        total_spent -> Float8,
        last_visit -> Nullable<Timestamptz>,
        loyalty_points -> Int4,
        profile_completion -> Int2,
        tags -> Array<Text>,
        gender -> Nullable<Text>,
        location -> Nullable<Text>,
    }
}

diesel::table! {
    orders (id) {
        id -> Uuid,
        restaurant_id -> Uuid,
        customer_id -> Nullable<Uuid>,
        order_number -> Text,
        total_amount -> Float8,
        order_date -> Nullable<Timestamptz>,
        status -> Nullable<Text>,
    }
}

diesel::table! {
    /// Launched, scheduled, and draft campaigns.
    campaigns (id) {
        id -> Uuid,
        restaurant_id -> Uuid,
        name -> Text,
        /// Channel list label such as `WhatsApp + SMS`.
        #[sql_name = "type"]
        channel_label -> Text,
        status -> Text,
        /// Per-channel copy as a JSON object.
        message_content -> Jsonb,
        target_audience -> Jsonb,
        offer_type -> Text,
        has_whatsapp -> Bool,
        scheduled_at -> Nullable<Timestamptz>,
        sent_at -> Nullable<Timestamptz>,
        total_sent -> Int8,
        total_delivered -> Int8,
        total_opened -> Int8,
        /// Redemptions attributed to the campaign.
        total_clicked -> Int8,
        revenue_generated -> Float8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    loyalty_rewards (id) {
        id -> Uuid,
        restaurant_id -> Uuid,
        name -> Text,
        points_required -> Int4,
        reward_type -> Text,
        reward_value -> Float8,
        is_active -> Bool,
        total_redeemed -> Int4,
    }
}

diesel::table! {
    reward_redemptions (id) {
        id -> Uuid,
        restaurant_id -> Uuid,
        customer_id -> Nullable<Uuid>,
        reward_id -> Nullable<Uuid>,
        points_used -> Int4,
        redeemed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    feedback (id) {
        id -> Uuid,
        restaurant_id -> Uuid,
        customer_id -> Nullable<Uuid>,
        rating -> Int2,
        comment -> Nullable<Text>,
        created_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    qr_codes (id) {
        id -> Uuid,
        restaurant_id -> Uuid,
        name -> Text,
        code -> Text,
        scan_count -> Int4,
        is_active -> Bool,
    }
}

diesel::table! {
    /// Messaging credits; a missing or zero counter falls back to defaults.
    credits_balance (restaurant_id) {
        restaurant_id -> Uuid,
        sms_credits -> Nullable<Int8>,
        email_credits -> Nullable<Int8>,
        whatsapp_utility_credits -> Nullable<Int8>,
        whatsapp_marketing_credits -> Nullable<Int8>,
    }
}

diesel::joinable!(restaurants -> accounts (owner_id));
diesel::joinable!(onboarding_progress -> accounts (owner_id));
diesel::joinable!(customers -> restaurants (restaurant_id));
diesel::joinable!(orders -> restaurants (restaurant_id));
diesel::joinable!(campaigns -> restaurants (restaurant_id));
diesel::joinable!(loyalty_rewards -> restaurants (restaurant_id));
diesel::joinable!(reward_redemptions -> restaurants (restaurant_id));
diesel::joinable!(feedback -> restaurants (restaurant_id));
diesel::joinable!(qr_codes -> restaurants (restaurant_id));
diesel::joinable!(credits_balance -> restaurants (restaurant_id));

diesel::allow_tables_to_appear_in_same_query!(
    accounts,
    restaurants,
    onboarding_progress,
    customers,
    orders,
    campaigns,
    loyalty_rewards,
    reward_redemptions,
    feedback,
    qr_codes,
    credits_balance,
);
