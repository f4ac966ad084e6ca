//! Diagram workbench: the state a drawing session keeps around the service.
//!
//! The workbench owns the latest remote diagram, its TikZ translation, the
//! optional paper context and a running chat history. Only the most recent
//! [`HISTORY_WINDOW`] history entries are sent with a refine request.

use sketch_core::SketchSession;

use crate::client::{
    DiagramClient, GenerateRequest, GeneratedDiagram, IterateRequest, IteratedDiagram,
    RefineRequest, RefinedDiagram, TikzRequest, DEFAULT_DIAGRAM_TYPE, DEFAULT_STYLE,
};
use crate::error::{DiagramError, DiagramResult};

/// Number of history entries sent as `previous_iterations`.
pub const HISTORY_WINDOW: usize = 4;

/// Service-side state of a sketching session.
#[derive(Debug, Clone)]
pub struct Workbench {
    client: DiagramClient,
    style: String,
    context: Option<String>,
    current_svg: Option<String>,
    current_tikz: Option<String>,
    history: Vec<String>,
}

impl Workbench {
    /// Create an empty workbench using the default style.
    #[must_use]
    pub fn new(client: DiagramClient) -> Self {
        Self {
            client,
            style: DEFAULT_STYLE.to_string(),
            context: None,
            current_svg: None,
            current_tikz: None,
            history: Vec::new(),
        }
    }

    /// The underlying client.
    #[must_use]
    pub fn client(&self) -> &DiagramClient {
        &self.client
    }

    /// Selected journal style id.
    #[must_use]
    pub fn style(&self) -> &str {
        &self.style
    }

    /// Select the journal style for subsequent requests.
    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }

    /// Paper context sent with refine and generate requests.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Set or clear the paper context.
    pub fn set_context(&mut self, context: Option<String>) {
        self.context = context.filter(|c| !c.trim().is_empty());
    }

    /// Latest diagram returned by the service.
    #[must_use]
    pub fn current_svg(&self) -> Option<&str> {
        self.current_svg.as_deref()
    }

    /// Latest TikZ translation.
    #[must_use]
    pub fn current_tikz(&self) -> Option<&str> {
        self.current_tikz.as_deref()
    }

    /// Full chat history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The tail of the history that accompanies a refine request.
    #[must_use]
    pub fn recent_history(&self) -> &[String] {
        let start = self.history.len().saturating_sub(HISTORY_WINDOW);
        &self.history[start..]
    }

    /// Send the sketch with a description and keep the refined diagram.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::MissingInput`] for a blank description,
    /// [`DiagramError::Canvas`] for an empty sketch, and any client error.
    pub async fn refine(
        &mut self,
        session: &mut SketchSession,
        description: &str,
    ) -> DiagramResult<RefinedDiagram> {
        let description = non_blank(description, "description")?;
        let sketch_svg = session.export_svg()?.to_owned();

        let recent = self.recent_history();
        let request = RefineRequest {
            sketch_svg,
            description: description.to_string(),
            style: self.style.clone(),
            context: self.context.clone(),
            previous_iterations: (!recent.is_empty()).then(|| recent.to_vec()),
        };
        let refined = self.client.refine(&request).await?;

        tracing::debug!("Refined sketch in {} style", refined.style_name);
        self.current_svg = Some(refined.refined_svg.clone());
        self.history.push(format!(
            "User: {description}\nAI: Refined diagram in {} style",
            refined.style_name
        ));
        Ok(refined)
    }

    /// Generate a diagram from text alone and keep it.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::MissingInput`] for a blank description and any
    /// client error.
    pub async fn generate(
        &mut self,
        description: &str,
        diagram_type: Option<&str>,
    ) -> DiagramResult<GeneratedDiagram> {
        let description = non_blank(description, "description")?;
        let diagram_type = diagram_type.unwrap_or(DEFAULT_DIAGRAM_TYPE);

        let request = GenerateRequest {
            description: description.to_string(),
            style: self.style.clone(),
            diagram_type: diagram_type.to_string(),
            context: self.context.clone(),
        };
        let generated = self.client.generate(&request).await?;

        tracing::debug!(
            "Generated {} diagram in {} style",
            generated.diagram_type,
            generated.style_name
        );
        self.current_svg = Some(generated.svg.clone());
        self.history
            .push(format!("User: {description}\nAI: Generated {diagram_type} diagram"));
        Ok(generated)
    }

    /// Ask for changes to the current diagram.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::MissingInput`] if there is no current diagram
    /// or the feedback is blank, and any client error.
    pub async fn iterate(&mut self, feedback: &str) -> DiagramResult<IteratedDiagram> {
        let current_svg = self
            .current_svg
            .clone()
            .ok_or(DiagramError::MissingInput("current diagram"))?;
        let feedback = non_blank(feedback, "feedback")?;

        let request = IterateRequest {
            current_svg,
            feedback: feedback.to_string(),
            style: self.style.clone(),
        };
        let iterated = self.client.iterate(&request).await?;

        self.current_svg = Some(iterated.svg.clone());
        self.history
            .push(format!("User: {feedback}\nAI: Updated diagram"));
        Ok(iterated)
    }

    /// Convert the current diagram to TikZ and keep the result.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::MissingInput`] if there is no current diagram,
    /// and any client error.
    pub async fn export_tikz(&mut self, description: Option<&str>) -> DiagramResult<String> {
        let svg = self
            .current_svg
            .clone()
            .ok_or(DiagramError::MissingInput("current diagram"))?;
        let request = TikzRequest {
            svg,
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        };
        let tikz = self.client.svg_to_tikz(&request).await?;
        self.current_tikz = Some(tikz.clone());
        Ok(tikz)
    }

    /// Forget the current diagram, its TikZ and the history.
    pub fn reset(&mut self) {
        self.current_svg = None;
        self.current_tikz = None;
        self.history.clear();
        tracing::debug!("Workbench reset");
    }

    /// Clear the sketch and reset the workbench with it.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::Canvas`] if a gesture is in progress.
    pub fn clear(&mut self, session: &mut SketchSession) -> DiagramResult<()> {
        session.clear()?;
        self.reset();
        Ok(())
    }
}

fn non_blank<'a>(value: &'a str, name: &'static str) -> DiagramResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DiagramError::MissingInput(name))
    } else {
        Ok(trimmed)
    }
}
