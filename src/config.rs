// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    common::events::EventBus,
    db::{
        AdminRepository, BudgetsRepository, CatalogRepository, ClientsRepository,
        DocumentsRepository, FinanceRepository, FleetRepository, HrRepository, JobsRepository,
        LeadsRepository, TravelRepository,
    },
    services::{
        audit_service::AuditService, budgets_service::BudgetsService,
        catalog_service::CatalogService, clients_service::ClientsService,
        documents_service::DocumentsService, finance_service::FinanceService,
        fleet_service::FleetService, hr_service::HrService, jobs_service::JobsService,
        leads_service::LeadsService, mail_client::MailClient, maps_client::MapsClient,
        pdf_service::PdfService, portal_service::PortalService, storage_client::StorageClient,
        travel_service::TravelService,
    },
};

/// Variáveis de ambiente, validadas na subida.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub download_secret: String,
    pub public_base_url: String,
    pub maps_base_url: String,
    pub maps_api_key: String,
    pub mail_gateway_url: String,
    pub mail_gateway_token: String,
    pub mail_from: String,
    pub storage_base_url: String,
    pub storage_token: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        if !database_url.starts_with("postgres://") && !database_url.starts_with("postgresql://") {
            anyhow::bail!("DATABASE_URL deve começar com postgres:// ou postgresql://");
        }

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT deve ser um número válido"))?;

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;
        // Na falta de um segredo próprio, os links de download usam o do JWT
        let download_secret = env::var("DOWNLOAD_URL_SECRET").unwrap_or_else(|_| jwt_secret.clone());

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        Ok(Self {
            database_url,
            port,
            jwt_secret,
            download_secret,
            public_base_url,
            maps_base_url: env::var("MAPS_BASE_URL")
                .map_err(|_| anyhow::anyhow!("MAPS_BASE_URL deve ser definida"))?,
            maps_api_key: env::var("MAPS_API_KEY")
                .map_err(|_| anyhow::anyhow!("MAPS_API_KEY deve ser definida"))?,
            mail_gateway_url: env::var("MAIL_GATEWAY_URL")
                .map_err(|_| anyhow::anyhow!("MAIL_GATEWAY_URL deve ser definida"))?,
            mail_gateway_token: env::var("MAIL_GATEWAY_TOKEN")
                .map_err(|_| anyhow::anyhow!("MAIL_GATEWAY_TOKEN deve ser definido"))?,
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "nao-responda@perfusolo.com.br".to_string()),
            storage_base_url: env::var("STORAGE_BASE_URL")
                .map_err(|_| anyhow::anyhow!("STORAGE_BASE_URL deve ser definida"))?,
            storage_token: env::var("STORAGE_TOKEN")
                .map_err(|_| anyhow::anyhow!("STORAGE_TOKEN deve ser definido"))?,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db_pool: PgPool,
    pub events: EventBus,
    pub admin_repo: AdminRepository,
    pub audit: AuditService,
    pub clients_service: ClientsService,
    pub portal_service: PortalService,
    pub jobs_service: JobsService,
    pub budgets_service: BudgetsService,
    pub finance_service: FinanceService,
    pub catalog_service: CatalogService,
    pub fleet_service: FleetService,
    pub hr_service: HrService,
    pub leads_service: LeadsService,
    pub travel_service: TravelService,
    pub documents_service: DocumentsService,
    pub pdf_service: PdfService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, a aplicação
    // não deve subir.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::from_env()?;

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let events = EventBus::new();

        // Repositórios
        let admin_repo = AdminRepository::new(db_pool.clone());
        let clients_repo = ClientsRepository::new(db_pool.clone());
        let jobs_repo = JobsRepository::new(db_pool.clone());
        let budgets_repo = BudgetsRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let fleet_repo = FleetRepository::new(db_pool.clone());
        let hr_repo = HrRepository::new(db_pool.clone());
        let leads_repo = LeadsRepository::new(db_pool.clone());
        let travel_repo = TravelRepository::new(db_pool.clone());
        let documents_repo = DocumentsRepository::new(db_pool.clone());

        // Clientes de serviços externos
        let maps = MapsClient::new(config.maps_base_url.clone(), config.maps_api_key.clone())?;
        let mail = MailClient::new(
            config.mail_gateway_url.clone(),
            config.mail_gateway_token.clone(),
            config.mail_from.clone(),
        )?;
        let storage = StorageClient::new(
            config.storage_base_url.clone(),
            config.storage_token.clone(),
        )?;

        // Serviços
        let audit = AuditService::new(admin_repo.clone());
        let catalog_service = CatalogService::new(catalog_repo);
        let clients_service =
            ClientsService::new(db_pool.clone(), clients_repo.clone(), events.clone());
        let portal_service = PortalService::new(
            db_pool.clone(),
            clients_repo.clone(),
            mail,
            config.jwt_secret.clone(),
            config.public_base_url.clone(),
        );
        let jobs_service = JobsService::new(
            db_pool.clone(),
            jobs_repo.clone(),
            clients_repo.clone(),
            hr_repo.clone(),
            finance_repo.clone(),
            catalog_service.clone(),
            events.clone(),
        );
        let budgets_service = BudgetsService::new(
            db_pool.clone(),
            budgets_repo.clone(),
            clients_repo.clone(),
            hr_repo.clone(),
            jobs_repo,
            catalog_service.clone(),
            events.clone(),
        );
        let finance_service = FinanceService::new(db_pool.clone(), finance_repo);
        let fleet_service = FleetService::new(fleet_repo);
        let hr_service = HrService::new(hr_repo);
        let leads_service = LeadsService::new(
            db_pool.clone(),
            leads_repo,
            clients_repo,
            budgets_repo,
            events.clone(),
        );
        let travel_service = TravelService::new(travel_repo, maps);
        let documents_service = DocumentsService::new(
            documents_repo,
            storage,
            config.download_secret.clone(),
            config.public_base_url.clone(),
        );

        Ok(Self {
            config,
            db_pool,
            events,
            admin_repo,
            audit,
            clients_service,
            portal_service,
            jobs_service,
            budgets_service,
            finance_service,
            catalog_service,
            fleet_service,
            hr_service,
            leads_service,
            travel_service,
            documents_service,
            pdf_service: PdfService::new(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.config.port)
    }
}
