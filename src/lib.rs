pub mod assessment;
pub mod fitness;
pub mod formations;
pub mod html_import;
pub mod lineup;
pub mod positions;
pub mod scorer;
pub mod scoring_config;
pub mod squad;
pub mod squad_export;
pub mod squad_report;
pub mod state;
pub mod styles;
