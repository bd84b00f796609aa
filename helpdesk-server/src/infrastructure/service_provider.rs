use std::sync::Arc;

use domain_helpdesk::{model::vo::ReportHeader, service::*};
use getset::Getters;
use service_helpdesk::*;

use super::{
    config::HelpdeskConfig,
    database::{Database, SeaOrmDbRepository},
    pdf::PdfReportRenderer,
    render::Templates,
};

/// Wires repositories into services once per process and hands them to the web host.
#[derive(Clone, Getters)]
#[getset(get = "pub")]
pub struct ServiceProvider {
    config: HelpdeskConfig,
    database: Arc<Database>,
    templates: Arc<Templates>,
    ticket_service: Arc<dyn TicketService>,
    ticket_query_service: Arc<dyn TicketQueryService>,
    report_service: Arc<dyn ReportService>,
    account_service: Arc<dyn AccountService>,
    auth_service: Arc<dyn AuthService>,
}

impl ServiceProvider {
    /// Connects, migrates when enabled and creates the configured superuser.
    pub async fn build(config: HelpdeskConfig) -> anyhow::Result<Self> {
        let database = Arc::new(Database::connect(config.db().url()).await?);
        if *config.db().migrate() {
            database.migrate().await?;
        }
        let sp = Self::from_database(database, config)?;
        sp.bootstrap().await?;
        Ok(sp)
    }

    pub fn from_database(database: Arc<Database>, config: HelpdeskConfig) -> anyhow::Result<Self> {
        let repository = Arc::new(SeaOrmDbRepository::builder().db(database.clone()).build());
        let header = ReportHeader {
            organisation: config.report().organisation().clone(),
            area_lines: config.report().area_lines().clone(),
        };
        Ok(Self {
            templates: Arc::new(Templates::new()?),
            ticket_service: Arc::new(
                TicketServiceImpl::builder()
                    .ticket_repo(repository.clone())
                    .comment_repo(repository.clone())
                    .account_repo(repository.clone())
                    .build(),
            ),
            ticket_query_service: Arc::new(
                TicketQueryServiceImpl::builder()
                    .ticket_repo(repository.clone())
                    .account_repo(repository.clone())
                    .build(),
            ),
            report_service: Arc::new(
                ReportServiceImpl::builder()
                    .ticket_repo(repository.clone())
                    .comment_repo(repository.clone())
                    .renderer(Arc::new(PdfReportRenderer))
                    .header(header)
                    .build(),
            ),
            account_service: Arc::new(
                AccountServiceImpl::builder().account_repo(repository.clone()).build(),
            ),
            auth_service: Arc::new(
                AuthServiceImpl::builder()
                    .account_repo(repository.clone())
                    .session_repo(repository)
                    .build(),
            ),
            database,
            config,
        })
    }

    async fn bootstrap(&self) -> anyhow::Result<()> {
        let Some(bootstrap) = self.config.bootstrap() else {
            return Ok(());
        };
        match self
            .account_service
            .bootstrap_superuser(bootstrap.username(), bootstrap.password(), bootstrap.email())
            .await
        {
            Ok(Some(_)) => Ok(()),
            Ok(None) => {
                tracing::debug!("Superuser {} already exists.", bootstrap.username());
                Ok(())
            }
            Err(e) => Err(anyhow::anyhow!("Cannot create superuser {}: {e}", bootstrap.username())),
        }
    }
}
