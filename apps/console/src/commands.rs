//! Subcommand handlers. Each returns the JSON document to print, or `None`
//! once the failure has been reported through the notifier.

use std::path::Path;
use std::sync::Arc;

use autonomo_application::{
    AdminUserService, AuditLogStore, Notifier, SessionService, SystemConfigStore,
    SystemReportsStore, TokenStore,
};
use autonomo_core::AppResult;
use autonomo_domain::{
    AdminUserFilter, AuditLogEntry, AuditLogFilter, AuditLogStats, ConfigValue, CreateUserInput,
    SystemConfigMap, field_type_for, format_action, format_date, format_resource_type,
};
use autonomo_infrastructure::{
    ApiClient, FileTokenStore, HttpAdminUserGateway, HttpAuditLogGateway, HttpAuthGateway,
    HttpSystemConfigGateway, HttpSystemReportsGateway, TracingNotifier,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::cli::{
    AuditCommand, AuditFilterArgs, Command, ConfigCommand, LoginArgs, RegisterArgs,
    ReportsCommand, UsersCommand,
};
use crate::config::ConsoleConfig;

/// Stores and services wired against the REST backend.
pub struct Console {
    api_base_url: String,
    notifier: Arc<dyn Notifier>,
    session: SessionService,
    admin_users: AdminUserService,
    audit_logs: AuditLogStore,
    system_config: SystemConfigStore,
    system_reports: SystemReportsStore,
}

impl Console {
    /// Wires every store against the configured backend.
    pub fn build(config: &ConsoleConfig) -> AppResult<Self> {
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.token_path));
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier::new());
        let client = ApiClient::new(
            config.api_base_url.as_str(),
            config.http_timeout,
            Arc::clone(&tokens),
        )?;

        Ok(Self {
            api_base_url: config.api_base_url.clone(),
            session: SessionService::new(
                Arc::new(HttpAuthGateway::new(client.clone())),
                tokens,
                Arc::clone(&notifier),
            ),
            admin_users: AdminUserService::new(
                Arc::new(HttpAdminUserGateway::new(client.clone())),
                Arc::clone(&notifier),
            ),
            audit_logs: AuditLogStore::new(
                Arc::new(HttpAuditLogGateway::new(client.clone())),
                Arc::clone(&notifier),
            ),
            system_config: SystemConfigStore::new(
                Arc::new(HttpSystemConfigGateway::new(client.clone())),
                Arc::clone(&notifier),
            ),
            system_reports: SystemReportsStore::new(
                Arc::new(HttpSystemReportsGateway::new(client)),
                Arc::clone(&notifier),
            ),
            notifier,
        })
    }

    /// Runs one subcommand.
    pub async fn run(&self, command: Command) -> Option<Value> {
        match command {
            Command::Login(args) => self.login(args).await,
            Command::Logout => {
                self.session.logout().await;
                Some(json!({"authenticated": false}))
            }
            Command::Whoami => to_json(&self.session.current_user().await?),
            Command::Status => Some(json!({
                "api_base_url": self.api_base_url,
                "authenticated": self.session.is_authenticated(Utc::now()).await,
            })),
            Command::Register(args) => self.register(args).await,
            Command::Audit(command) => self.audit(command).await,
            Command::Config(command) => self.config(command).await,
            Command::Reports(command) => self.reports(command).await,
            Command::Users(command) => self.users(command).await,
        }
    }

    async fn login(&self, args: LoginArgs) -> Option<Value> {
        let user = match (args.google_token, args.email) {
            (Some(google_token), _) => self.session.login_with_google(&google_token).await,
            (None, Some(email)) => {
                let password = args.password.unwrap_or_default();
                self.session.login(&email, &password).await
            }
            (None, None) => {
                self.notifier.error("Informe --email ou --google-token");
                None
            }
        }?;

        to_json(&user)
    }

    async fn register(&self, args: RegisterArgs) -> Option<Value> {
        let user = self
            .session
            .register(CreateUserInput {
                email: args.email,
                name: args.name,
                password: args.password,
            })
            .await?;

        to_json(&user)
    }

    async fn audit(&self, command: AuditCommand) -> Option<Value> {
        match command {
            AuditCommand::List(filter) => {
                self.audit_logs.load_logs(Some(audit_filter(filter))).await;
                let state = self.audit_logs.snapshot().await;
                if state.error.is_some() {
                    return None;
                }

                Some(json!({
                    "total": state.total_logs,
                    "logs": state.logs.iter().map(labelled_entry).collect::<Vec<_>>(),
                }))
            }
            AuditCommand::Stats(window) => {
                self.audit_logs.load_stats(window.days).await;
                let state = self.audit_logs.snapshot().await;
                if state.error.is_some() {
                    return None;
                }

                state.stats.as_ref().map(labelled_stats)
            }
            AuditCommand::Actions => {
                self.audit_logs.refresh_filters().await;
                let state = self.audit_logs.snapshot().await;
                Some(json!({
                    "actions": state.actions,
                    "resource_types": state.resource_types,
                }))
            }
            AuditCommand::Cleanup { days_to_keep } => {
                if !self.audit_logs.cleanup_logs(days_to_keep).await {
                    return None;
                }

                let state = self.audit_logs.snapshot().await;
                Some(json!({
                    "days_to_keep": days_to_keep,
                    "remaining": state.total_logs,
                }))
            }
            AuditCommand::Export { filter, output_dir } => {
                self.export_audit_logs(filter, &output_dir).await
            }
        }
    }

    async fn export_audit_logs(&self, filter: AuditFilterArgs, output_dir: &Path) -> Option<Value> {
        self.audit_logs.load_logs(Some(audit_filter(filter))).await;
        if self.audit_logs.snapshot().await.error.is_some() {
            return None;
        }

        let export = self
            .audit_logs
            .export_csv(Utc::now().date_naive())
            .await?;
        let path = output_dir.join(&export.filename);
        if let Err(write_error) = tokio::fs::write(&path, export.content.as_bytes()).await {
            error!(path = %path.display(), error = %write_error, "failed to write CSV export");
            self.notifier.error("Erro ao salvar arquivo de exportação");
            return None;
        }

        info!(path = %path.display(), rows = export.row_count, "CSV export written");
        Some(json!({
            "file": path.display().to_string(),
            "rows": export.row_count,
        }))
    }

    async fn config(&self, command: ConfigCommand) -> Option<Value> {
        let store = &self.system_config;
        match command {
            ConfigCommand::List { category, public } => {
                if public {
                    store.load_public_configs().await;
                } else {
                    store.load_configs(category).await;
                }
                let state = store.snapshot().await;
                if state.error.is_some() {
                    return None;
                }

                to_json(&state.configs)
            }
            ConfigCommand::Get { key } => {
                let value = store.fetch_value(&key).await?;
                Some(json!({"key": key, "value": value}))
            }
            ConfigCommand::Set { assignments } => self.set_configs(assignments).await,
            ConfigCommand::History { key, limit } => {
                store.load_history(key, limit).await;
                to_json(&store.snapshot().await.history)
            }
            ConfigCommand::Categories => {
                store.load_categories().await;
                to_json(&store.snapshot().await.categories)
            }
            ConfigCommand::Reset => {
                if !store.reset_to_defaults().await {
                    return None;
                }
                to_json(&store.snapshot().await.configs)
            }
            ConfigCommand::Initialize => {
                if !store.initialize_defaults().await {
                    return None;
                }
                to_json(&store.snapshot().await.configs)
            }
        }
    }

    async fn set_configs(&self, assignments: Vec<(String, String)>) -> Option<Value> {
        let store = &self.system_config;
        store.load_configs(None).await;
        let current = store.snapshot().await;
        if current.error.is_some() {
            return None;
        }

        let unset = ConfigValue::Null;
        for (key, raw) in assignments {
            let confirmed = current.configs.get(&key).unwrap_or(&unset);
            match ConfigValue::parse_as(field_type_for(&key, confirmed), &raw) {
                Ok(value) => store.stage_change(&key, value).await,
                Err(failure) => {
                    let message = failure.user_message("Valor inválido");
                    error!(key = %key, error = %failure, "rejected configuration input");
                    self.notifier.error(&format!("{key}: {message}"));
                    return None;
                }
            }
        }

        if !store.save_changes().await {
            return None;
        }

        let state = store.snapshot().await;
        let changed: SystemConfigMap = state
            .configs
            .iter()
            .filter(|(key, value)| current.configs.get(*key) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        to_json(&changed)
    }

    async fn reports(&self, command: ReportsCommand) -> Option<Value> {
        let store = &self.system_reports;
        match command {
            ReportsCommand::Dashboard => store.load_dashboard().await,
            ReportsCommand::Users(window) => store.load_user_statistics(window.days).await,
            ReportsCommand::Usage(window) => store.load_usage_statistics(window.days).await,
            ReportsCommand::Financial(window) => {
                store.load_financial_overview(window.days).await;
            }
            ReportsCommand::Engagement(window) => store.load_engagement(window.days).await,
            ReportsCommand::Health => store.load_health().await,
            ReportsCommand::All(window) => store.load_all(window.days).await,
        }

        let state = store.snapshot().await;
        if state.error.is_some() {
            return None;
        }

        Some(strip_nulls(json!({
            "dashboard": state.dashboard,
            "user_statistics": state.user_statistics,
            "usage_statistics": state.usage_statistics,
            "financial_overview": state.financial_overview,
            "engagement": state.engagement,
            "health": state.health,
        })))
    }

    async fn users(&self, command: UsersCommand) -> Option<Value> {
        match command {
            UsersCommand::List {
                search,
                role,
                active,
                skip,
                limit,
            } => {
                let filter = AdminUserFilter {
                    skip: Some(skip),
                    limit: Some(limit),
                    search,
                    role,
                    is_active: active,
                };
                to_json(&self.admin_users.list_users(&filter).await?)
            }
            UsersCommand::Show { id } => to_json(&self.admin_users.get_user(id).await?),
            UsersCommand::Activate { id } => {
                to_json(&self.admin_users.set_user_active(id, true).await?)
            }
            UsersCommand::Deactivate { id } => {
                to_json(&self.admin_users.set_user_active(id, false).await?)
            }
        }
    }
}

fn audit_filter(args: AuditFilterArgs) -> AuditLogFilter {
    AuditLogFilter {
        skip: Some(args.skip),
        limit: Some(args.limit),
        action: args.action,
        resource_type: args.resource_type,
        performed_by: args.performed_by,
        start_date: args.start_date,
        end_date: args.end_date,
    }
}

fn labelled_entry(entry: &AuditLogEntry) -> Value {
    json!({
        "id": entry.id,
        "date": format_date(&entry.timestamp),
        "action": format_action(&entry.action),
        "resource_type": format_resource_type(&entry.resource_type),
        "resource_id": entry.resource_id,
        "performed_by": entry.performed_by,
        "description": entry.description,
        "ip_address": entry.ip_address,
    })
}

fn labelled_stats(stats: &AuditLogStats) -> Value {
    json!({
        "total_logs": stats.total_logs,
        "unique_users": stats.unique_users,
        "logs_today": stats.logs_today,
        "logs_this_week": stats.logs_this_week,
        "top_actions": stats
            .top_actions
            .iter()
            .map(|entry| json!({
                "action": format_action(&entry.action),
                "count": entry.count,
                "share": stats.format_share(entry.count),
            }))
            .collect::<Vec<_>>(),
        "top_users": stats
            .top_users
            .iter()
            .map(|entry| json!({
                "user": entry.user,
                "count": entry.count,
                "share": stats.format_share(entry.count),
            }))
            .collect::<Vec<_>>(),
    })
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(_, field)| !field.is_null())
                .collect(),
        ),
        other => other,
    }
}

fn to_json<T: Serialize>(value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(value) => Some(value),
        Err(encode_error) => {
            error!(error = %encode_error, "failed to encode command output");
            None
        }
    }
}
