// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Clientes ---
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,
        handlers::clients::set_portal_password,
        handlers::clients::watch_clients,

        // --- Portal ---
        handlers::portal::login,
        handlers::portal::forgot_password,
        handlers::portal::reset_password,
        handlers::portal::me,
        handlers::portal::my_jobs,

        // --- Ordens de Serviço ---
        handlers::jobs::list_jobs,
        handlers::jobs::get_job,
        handlers::jobs::create_job,
        handlers::jobs::update_job,
        handlers::jobs::transition_job,
        handlers::jobs::delete_job,
        handlers::jobs::availability,
        handlers::jobs::record_payment,
        handlers::jobs::job_pdf,
        handlers::jobs::watch_team_jobs,

        // --- Orçamentos ---
        handlers::budgets::list_budgets,
        handlers::budgets::get_budget,
        handlers::budgets::create_budget,
        handlers::budgets::update_budget,
        handlers::budgets::approve_budget,
        handlers::budgets::reject_budget,
        handlers::budgets::convert_budget,
        handlers::budgets::delete_budget,
        handlers::budgets::budget_pdf,

        // --- Caixa ---
        handlers::finance::open_cashier,
        handlers::finance::close_cashier,
        handlers::finance::list_cashiers,
        handlers::finance::current_cashier,
        handlers::finance::cashier_summary,
        handlers::finance::list_cash_transactions,
        handlers::finance::create_cash_transaction,
        handlers::finance::delete_cash_transaction,

        // --- Catálogo ---
        handlers::catalog::list_catalog,
        handlers::catalog::resolve_catalog,
        handlers::catalog::create_catalog_entry,
        handlers::catalog::update_catalog_entry,
        handlers::catalog::delete_catalog_entry,

        // --- Frota ---
        handlers::fleet::list_machines,
        handlers::fleet::create_machine,
        handlers::fleet::update_machine,
        handlers::fleet::delete_machine,
        handlers::fleet::list_equipment,
        handlers::fleet::create_equipment,
        handlers::fleet::update_equipment,
        handlers::fleet::delete_equipment,
        handlers::fleet::list_maintenance,
        handlers::fleet::create_maintenance,
        handlers::fleet::delete_maintenance,

        // --- Equipes ---
        handlers::hr::list_employees,
        handlers::hr::get_employee,
        handlers::hr::create_employee,
        handlers::hr::update_employee,
        handlers::hr::delete_employee,
        handlers::hr::list_teams,
        handlers::hr::get_team,
        handlers::hr::create_team,
        handlers::hr::update_team,
        handlers::hr::delete_team,

        // --- Funil ---
        handlers::leads::capture,
        handlers::leads::list_leads,
        handlers::leads::get_lead,
        handlers::leads::convert_lead,
        handlers::leads::discard_lead,
        handlers::leads::delete_lead,
        handlers::leads::watch_leads,
        handlers::leads::watch_pending_count,

        // --- Deslocamento ---
        handlers::travel::list_rules,
        handlers::travel::create_rule,
        handlers::travel::update_rule,
        handlers::travel::delete_rule,
        handlers::travel::resolve_travel,
        handlers::travel::distance,
        handlers::travel::create_capture,
        handlers::travel::get_capture,
        handlers::travel::submit_capture,

        // --- Documentos ---
        handlers::documents::upload_document,
        handlers::documents::list_documents,
        handlers::documents::get_document,
        handlers::documents::document_url,
        handlers::documents::download_document,
        handlers::documents::delete_document,

        // --- Administração ---
        handlers::admin::list_users,
        handlers::admin::get_me,
        handlers::admin::create_user,
        handlers::admin::update_user,
        handlers::admin::delete_user,
        handlers::admin::get_settings,
        handlers::admin::update_settings,
        handlers::admin::list_audit,
        handlers::admin::list_social,
        handlers::admin::create_social,
        handlers::admin::update_social,
        handlers::admin::delete_social,
    ),
    components(
        schemas(
            // --- Clientes / Portal ---
            models::clients::PersonType,
            models::clients::ClientAddress,
            models::clients::Client,
            models::clients::PortalAuthResponse,
            handlers::clients::ClientPayload,
            handlers::clients::PortalPasswordPayload,
            handlers::portal::PortalLoginPayload,
            handlers::portal::ForgotPasswordPayload,
            handlers::portal::ResetPasswordPayload,

            // --- OS ---
            models::jobs::JobStatus,
            models::jobs::ServiceItem,
            models::jobs::ServiceItemInput,
            models::jobs::Job,
            models::jobs::AvailabilitySlot,
            models::jobs::DayAvailability,
            handlers::jobs::JobPayload,
            handlers::jobs::TransitionPayload,
            handlers::jobs::PaymentPayload,

            // --- Orçamentos ---
            models::budgets::BudgetStatus,
            models::budgets::Budget,
            handlers::budgets::BudgetPayload,
            handlers::budgets::RejectPayload,
            handlers::budgets::ConvertPayload,

            // --- Caixa ---
            models::finance::CashKind,
            models::finance::CashierStatus,
            models::finance::Cashier,
            models::finance::CashTransaction,
            models::finance::CashierSummary,
            handlers::finance::OpenCashierPayload,
            handlers::finance::CashTransactionPayload,

            // --- Catálogo ---
            models::catalog::CatalogEntry,
            handlers::catalog::CatalogPayload,

            // --- Frota ---
            models::fleet::Machine,
            models::fleet::Equipment,
            models::fleet::MaintenanceRecord,
            handlers::fleet::MachinePayload,
            handlers::fleet::EquipmentPayload,
            handlers::fleet::MaintenancePayload,

            // --- Equipes ---
            models::hr::Employee,
            models::hr::Team,
            handlers::hr::EmployeePayload,
            handlers::hr::TeamPayload,

            // --- Funil ---
            models::leads::LeadStatus,
            models::leads::OrcamentoRequest,
            models::leads::LeadConversion,
            models::leads::PendingCount,
            handlers::leads::CapturePayload,

            // --- Deslocamento ---
            models::travel::TravelRule,
            models::travel::TravelQuote,
            models::travel::DistanceResult,
            models::travel::LocationCapture,
            handlers::travel::TravelRulePayload,
            handlers::travel::ResolveTravelPayload,
            handlers::travel::DistancePayload,
            handlers::travel::CreateCapturePayload,
            handlers::travel::SubmitCapturePayload,

            // --- Documentos ---
            models::documents::DocumentMeta,
            models::documents::SignedUrl,

            // --- Administração ---
            models::admin::User,
            models::admin::Settings,
            models::admin::AuditEntry,
            models::admin::SocialLink,
            handlers::admin::UserPayload,
            handlers::admin::SettingsPayload,
            handlers::admin::SocialPayload,

            // --- Eventos ---
            common::events::ChangeKind,
            common::events::ChangeEvent,
        )
    ),
    tags(
        (name = "Clientes", description = "Cadastro de clientes e acesso ao portal"),
        (name = "Portal", description = "Autoatendimento do cliente"),
        (name = "Ordens de Serviço", description = "OSs, agenda e recebimento"),
        (name = "Orçamentos", description = "Cotações e conversão em OS"),
        (name = "Caixa", description = "Sessões de caixa e lançamentos"),
        (name = "Catálogo", description = "Matriz de preços por diâmetro/solo/acesso"),
        (name = "Frota", description = "Máquinas, equipamentos e manutenções"),
        (name = "Equipes", description = "Funcionários e equipes de campo"),
        (name = "Funil", description = "Pedidos públicos de orçamento"),
        (name = "Deslocamento", description = "Faixas de preço, distância e captura de localização"),
        (name = "Documentos", description = "Arquivos no bucket com download assinado"),
        (name = "Administração", description = "Usuários, configurações, auditoria e redes sociais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "portal_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
