pub mod plot_interaction;
