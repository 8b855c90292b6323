use crate::controller::{BackendStatus, ConversationController};
use crate::session::{Entry, EntryKind};
use crate::workflow::WorkflowBody;
use chrono::Local;
use eframe::egui::{self, Color32, RichText, ScrollArea};

const QUICK_PROMPTS: [&str; 5] = [
    "Create a workflow that monitors Gmail for invoices and saves attachments to Google Drive",
    "Build a workflow that posts to Twitter when a new blog post is published",
    "Create a workflow that backs up database data to AWS S3 every night",
    "Build a workflow that sends Slack notifications for new GitHub issues",
    "Create a workflow that processes CSV files and sends email reports",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Chat,
    Workflows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Submit,
    Generate,
}

pub struct FlowchatApp {
    controller: ConversationController,
    input_buffer: String,
    view: View,
    scroll_to_bottom: bool,
    pending_export: Option<WorkflowBody>,
}

impl FlowchatApp {
    pub fn new(ctx: &egui::Context, mut controller: ConversationController) -> Self {
        let repaint = ctx.clone();
        controller.set_waker(move || repaint.request_repaint());
        controller.probe_backend();

        Self {
            controller,
            input_buffer: String::new(),
            view: View::Chat,
            scroll_to_bottom: false,
            pending_export: None,
        }
    }

    fn status_label(&self) -> (&'static str, Color32) {
        match self.controller.backend_status() {
            BackendStatus::Reachable => ("Backend Connected", Color32::LIGHT_GREEN),
            BackendStatus::Unknown => ("Connecting...", Color32::YELLOW),
            BackendStatus::Unreachable => ("Backend Unreachable", Color32::RED),
        }
    }

    fn run_action(&mut self, action: Action) {
        let text = self.input_buffer.clone();
        let accepted = match action {
            Action::Submit => self.controller.submit(&text),
            Action::Generate => self.controller.generate(&text),
        };
        if accepted {
            self.input_buffer.clear();
            self.scroll_to_bottom = true;
        }
    }

    fn run_pending_export(&mut self) {
        let Some(workflow) = self.pending_export.take() else {
            return;
        };
        match self.controller.export(&workflow) {
            Ok(path) => self
                .controller
                .log_diagnostic(format!("exported workflow to {}", path.display())),
            Err(err) => {
                tracing::error!(error = %err, "workflow export failed");
                self.controller
                    .log_diagnostic(format!("workflow export failed: {err}"));
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let (status_label, status_color) = self.status_label();
        let workflow_count = self.controller.workflows().len();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Flowchat");
                ui.separator();
                ui.label(RichText::new(status_label).color(status_color));
                ui.separator();
                if ui
                    .selectable_label(self.view == View::Chat, "Chat")
                    .clicked()
                {
                    self.view = View::Chat;
                }
                if ui
                    .selectable_label(
                        self.view == View::Workflows,
                        format!("Workflows ({workflow_count})"),
                    )
                    .clicked()
                {
                    self.view = View::Workflows;
                    self.controller.refresh_workflows();
                }
            });
        });
    }

    fn render_workflow_preview(
        ui: &mut egui::Ui,
        workflow: &WorkflowBody,
        pending_export: &mut Option<WorkflowBody>,
    ) {
        ui.label(format!(
            "Name: {}",
            workflow.display_name().unwrap_or("(unnamed)")
        ));
        ui.label(format!("Nodes: {}", workflow.node_count()));
        if ui.button("Export").clicked() {
            *pending_export = Some(workflow.clone());
        }
    }

    fn render_entry(
        ui: &mut egui::Ui,
        entry: &Entry,
        pending_export: &mut Option<WorkflowBody>,
    ) {
        let time = entry.created_at.with_timezone(&Local).format("%H:%M:%S");
        ui.push_id(entry.id.value(), |ui| match entry.kind {
            EntryKind::UserInput => {
                ui.label(format!("[You] {}", entry.content));
            }
            EntryKind::AssistantReply => {
                ui.label(format!("[Assistant] {}", entry.content));
                if let Some(workflow) = &entry.workflow {
                    ui.group(|ui| {
                        ui.strong("Generated Workflow");
                        Self::render_workflow_preview(ui, workflow, pending_export);
                    });
                }
            }
            EntryKind::WorkflowResult => {
                ui.label(RichText::new("Workflow Generated!").color(Color32::LIGHT_GREEN));
                ui.label(&entry.content);
                if let Some(workflow_id) = &entry.workflow_id {
                    ui.label(RichText::new(format!("ID: {workflow_id}")).small());
                }
                if let Some(workflow) = &entry.workflow {
                    ui.group(|ui| Self::render_workflow_preview(ui, workflow, pending_export));
                }
            }
            EntryKind::Error => {
                ui.label(
                    RichText::new(format!("Error: {}", entry.content)).color(Color32::RED),
                );
            }
        });
        ui.label(RichText::new(time.to_string()).small().color(Color32::GRAY));
    }

    fn render_welcome(&mut self, ui: &mut egui::Ui) {
        ui.heading("Welcome to Flowchat");
        ui.label(
            "Describe the automation workflow you'd like to create, and a complete workflow will be generated for you.",
        );
        ui.strong("Try these examples:");
        let mut chosen = None;
        for prompt in QUICK_PROMPTS {
            if ui
                .add_enabled(!self.controller.is_busy(), egui::Button::new(prompt))
                .clicked()
            {
                chosen = Some(prompt);
            }
        }
        if let Some(prompt) = chosen {
            if self.controller.submit(prompt) {
                self.scroll_to_bottom = true;
            }
        }
    }

    fn render_chat(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let transcript_height = (ui.available_height() - 220.0).max(120.0);
            ScrollArea::vertical()
                .id_salt("chat_transcript")
                .max_height(transcript_height)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if self.controller.transcript().is_empty() {
                        self.render_welcome(ui);
                    }

                    for entry in self.controller.transcript().entries() {
                        Self::render_entry(ui, entry, &mut self.pending_export);
                        ui.separator();
                    }

                    if self.controller.is_busy() {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Generating workflow...");
                        });
                    }

                    if self.scroll_to_bottom {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
            self.scroll_to_bottom = false;

            ui.separator();
            self.render_diagnostics(ui);

            ui.separator();
            let busy = self.controller.is_busy();
            let hint = if busy {
                "Waiting for response..."
            } else {
                "Describe the workflow you want to create..."
            };

            let mut action = None;
            ui.horizontal(|ui| {
                let input_width = (ui.available_width() - 180.0).max(120.0);
                let response = ui.add_enabled(
                    !busy,
                    egui::TextEdit::multiline(&mut self.input_buffer)
                        .desired_rows(3)
                        .desired_width(input_width)
                        .hint_text(hint),
                );
                let enter = response.has_focus()
                    && ui.input(|i| i.key_pressed(egui::Key::Enter) && !i.modifiers.shift);
                if enter {
                    self.input_buffer = self.input_buffer.trim_end_matches('\n').to_string();
                    action = Some(Action::Submit);
                }

                let ready = !busy && !self.input_buffer.trim().is_empty();
                let send_label = if busy { "..." } else { "Send" };
                if ui
                    .add_enabled(ready, egui::Button::new(send_label))
                    .clicked()
                {
                    action = Some(Action::Submit);
                }
                if ui
                    .add_enabled(ready, egui::Button::new("Generate"))
                    .clicked()
                {
                    action = Some(Action::Generate);
                }
            });

            if let Some(action) = action {
                self.run_action(action);
            }
        });
    }

    fn render_workflows(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Your Generated Workflows");
            ui.label("All workflows generated in this session");
            ui.separator();

            if self.controller.workflows().is_empty() {
                ui.label(
                    "No workflows generated yet. Go to the Chat tab to start creating workflows!",
                );
                return;
            }

            ScrollArea::vertical()
                .id_salt("workflow_cards")
                .show(ui, |ui| {
                    for workflow in self.controller.workflows() {
                        ui.push_id(&workflow.id, |ui| {
                            ui.group(|ui| {
                                ui.horizontal(|ui| {
                                    ui.strong(&workflow.name);
                                    ui.label(
                                        RichText::new(&workflow.status)
                                            .color(Color32::LIGHT_BLUE),
                                    );
                                });
                                ui.label(&workflow.description);
                                ui.horizontal(|ui| {
                                    ui.label(format!(
                                        "{} nodes",
                                        workflow.workflow_json.node_count()
                                    ));
                                    ui.label(&workflow.ai_model_used);
                                });
                                if ui.button("Export").clicked() {
                                    self.pending_export = Some(workflow.workflow_json.clone());
                                }
                            });
                        });
                    }
                });
        });
    }

    fn render_diagnostics(&self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Diagnostics")
            .default_open(false)
            .show(ui, |ui| {
                ui.label(format!("Session: {}", self.controller.session().session_id()));
                ui.label(format!(
                    "Transcript entries: {}",
                    self.controller.transcript().len()
                ));
                ui.label(format!(
                    "Exports: {}",
                    self.controller.export_dir().display()
                ));
                ScrollArea::vertical()
                    .id_salt("diagnostics_log")
                    .max_height(90.0)
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in self.controller.diagnostics() {
                            ui.label(entry);
                        }
                    });
            });
    }
}

impl eframe::App for FlowchatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.controller.poll_events() > 0 {
            self.scroll_to_bottom = true;
        }
        self.render_top_bar(ctx);
        match self.view {
            View::Chat => self.render_chat(ctx),
            View::Workflows => self.render_workflows(ctx),
        }
        self.run_pending_export();
    }
}
