/// Route component constants shared across crates
pub const TZ_ROUTE_COMPONENT: &str = "tz";
pub const TZ_ROUTE_PREFIX: &str = const_str::concat!("/", TZ_ROUTE_COMPONENT);

pub const SET_ROUTE_COMPONENT: &str = "set";
pub const SET_ROUTE_PREFIX: &str = const_str::concat!(TZ_ROUTE_PREFIX, "/", SET_ROUTE_COMPONENT);

pub const CURRENT_ROUTE_COMPONENT: &str = "current";
pub const CURRENT_ROUTE_PREFIX: &str =
    const_str::concat!(TZ_ROUTE_PREFIX, "/", CURRENT_ROUTE_COMPONENT);
