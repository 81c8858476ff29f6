use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::mutation::{QuantityOp, SelectionInput},
    cart::pricing::PriceQuote,
    cart::types::{CartLine, CartTotals, OptionDef, SelectedOption, ServiceType},
    dto::{
        cart::{AddItemRequest, ApplyCouponRequest, AvailableSelections, ConnectCartRequest},
        foods::FoodList,
    },
    models::{CartSnapshot, FoodView, VendorSummary},
    response::{ApiResponse, Meta},
    routes::{cart, foods, health, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::get_cart,
        cart::add_item,
        cart::remove_line,
        cart::clear_cart,
        cart::list_available_selections,
        cart::connect_cart,
        cart::disconnect_cart,
        cart::apply_coupon,
        cart::remove_coupon,
        foods::list_foods,
        foods::get_food
    ),
    components(
        schemas(
            CartSnapshot,
            CartLine,
            CartTotals,
            SelectedOption,
            OptionDef,
            ServiceType,
            QuantityOp,
            SelectionInput,
            PriceQuote,
            VendorSummary,
            FoodView,
            FoodList,
            AddItemRequest,
            ConnectCartRequest,
            ApplyCouponRequest,
            AvailableSelections,
            params::Pagination,
            params::FoodQuery,
            Meta,
            ApiResponse<CartSnapshot>,
            ApiResponse<FoodView>,
            ApiResponse<FoodList>,
            ApiResponse<AvailableSelections>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Cart", description = "Cart composition, sharing and coupon endpoints"),
        (name = "Foods", description = "Catalog read endpoints with resolved pricing"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
