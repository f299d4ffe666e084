use crate::datasource::DataSource;

pub struct AppState {
    pub data_source: DataSource,
}
