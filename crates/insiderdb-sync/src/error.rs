use thiserror::Error;

/// Hard failures of a pipeline run.
///
/// Most trouble inside a run (a filing that won't parse, a below-threshold
/// transaction, one failed insert) is counted in the run summary instead.
/// These variants are reserved for the cases that abort a whole source:
/// a total fetch failure of its feed or an unusable store.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Edgar(#[from] insiderdb_edgar::EdgarError),

    #[error(transparent)]
    Reddit(#[from] insiderdb_reddit::RedditError),

    #[error(transparent)]
    Db(#[from] insiderdb_db::DbError),
}
