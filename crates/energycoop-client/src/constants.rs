// Vensys customer API paths

pub mod vensys_api_path {
    pub const MEAN_ENERGY_YIELD: &str = "/api/v1.0/Customer/MeanData/EnergyYield";
    pub const CURRENT_PERFORMANCE: &str = "/api/v1.0/Customer/Performance/Current";
    pub const PERFORMANCE: &str = "/api/v1.0/Customer/Performance";
}

pub const PARAM_FROM: &str = "from";
pub const PARAM_TO: &str = "to";
