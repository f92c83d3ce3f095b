//! Layout configuration

/// Geometry constants used by the layouter
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Default lane width
    pub participant_width: f64,
    /// Default horizontal gap between lanes
    pub participant_spacing: f64,
    /// Height of the participant header box
    pub participant_box_height: f64,
    /// Default title tab width
    pub title_box_width: f64,
    /// Default title tab height
    pub title_box_height: f64,
    /// Space between the diagram content and the title frame
    pub title_padding: f64,
    /// Frame kind tab width
    pub frame_box_width: f64,
    /// Frame kind tab height
    pub frame_box_height: f64,
    /// Space reserved below the tab for the frame label
    pub frame_label_height: f64,
    /// Horizontal space between a frame and its content
    pub frame_padding: f64,
    /// Default note size
    pub note_width: f64,
    pub note_height: f64,
    /// How far a self call loops out to the right
    pub self_call_width: f64,
    /// Vertical increment applied around every rendered statement
    pub statement_offset: f64,
    /// Vertical room for a message label line
    pub message_spacing: f64,
    /// Extra room for every further label line
    pub line_height: f64,
    /// Activation bar width
    pub activation_width: f64,
    /// Horizontal shift between stacked activation bars
    pub activation_stack_offset: f64,
    /// Distance of the found/lost edges from the outermost lanes
    pub boundary_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            participant_width: 160.0,
            participant_spacing: 40.0,
            participant_box_height: 40.0,
            title_box_width: 160.0,
            title_box_height: 40.0,
            title_padding: 30.0,
            frame_box_width: 60.0,
            frame_box_height: 20.0,
            frame_label_height: 30.0,
            frame_padding: 10.0,
            note_width: 100.0,
            note_height: 40.0,
            self_call_width: 30.0,
            statement_offset: 10.0,
            message_spacing: 20.0,
            line_height: 16.0,
            activation_width: 10.0,
            activation_stack_offset: 10.0,
            boundary_offset: 40.0,
        }
    }
}

impl LayoutConfig {
    /// Set the vertical increment applied around statements
    pub fn with_statement_offset(mut self, offset: f64) -> Self {
        self.statement_offset = offset;
        self
    }

    /// Set the default lane width and spacing
    pub fn with_participant_size(mut self, width: f64, spacing: f64) -> Self {
        self.participant_width = width;
        self.participant_spacing = spacing;
        self
    }

    /// Set the activation bar width and stacking offset
    pub fn with_activation_width(mut self, width: f64) -> Self {
        self.activation_width = width;
        self.activation_stack_offset = width;
        self
    }

    /// Cursor position of the first statement
    pub fn start_y(&self) -> f64 {
        self.participant_box_height + 2.0 * self.statement_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_follows_statement_offset() {
        assert_eq!(LayoutConfig::default().start_y(), 60.0);
        assert_eq!(LayoutConfig::default().with_statement_offset(5.0).start_y(), 50.0);
    }

    #[test]
    fn test_activation_width_moves_stack_offset() {
        let config = LayoutConfig::default().with_activation_width(16.0);
        assert_eq!(config.activation_width, 16.0);
        assert_eq!(config.activation_stack_offset, 16.0);
    }
}
